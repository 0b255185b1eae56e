//! Action trait for type-safe state mutations

use std::fmt::Debug;

/// Marker trait for actions that can be dispatched to a store
///
/// Actions represent intents to change state. They should be:
/// - Clone: Actions may be logged or handed to middleware before the reducer
/// - Debug: For debugging and logging
/// - Send + 'static: So they can be produced by async tasks
pub trait Action: Clone + Debug + Send + 'static {
    /// Get the action name for logging and filtering
    fn name(&self) -> &'static str;
}

/// Short human-readable description of an action, used by logging middleware.
///
/// The default is the `Debug` output. Override it for actions carrying large
/// payloads.
pub trait ActionSummary: Action {
    fn summary(&self) -> String {
        format!("{:?}", self)
    }
}
