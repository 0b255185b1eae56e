//! Shared UI types: the menu tree and animation modes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A node of the navigation menu tree
///
/// Serialized as `{key, text, children?}`; leaves omit `children`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuNode {
    pub key: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<MenuNode>>,
}

impl MenuNode {
    /// Create a leaf node
    pub fn leaf(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
            children: None,
        }
    }

    /// Create a node with children
    pub fn branch(key: impl Into<String>, text: impl Into<String>, children: Vec<MenuNode>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
            children: Some(children),
        }
    }

    /// True when the node has no children (missing or empty list)
    pub fn is_leaf(&self) -> bool {
        self.children.as_ref().is_none_or(|c| c.is_empty())
    }

    pub fn children(&self) -> &[MenuNode] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Depth-first search for `key` in this node and its descendants
    pub fn find(&self, key: &str) -> Option<&MenuNode> {
        if self.key == key {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(key))
    }

    /// Visit this node and its descendants depth-first, pre-order,
    /// with the depth of each node (this node is depth 0)
    pub fn walk<F>(&self, f: &mut F)
    where
        F: FnMut(&MenuNode, usize),
    {
        self.walk_at(0, f);
    }

    fn walk_at<F>(&self, depth: usize, f: &mut F)
    where
        F: FnMut(&MenuNode, usize),
    {
        f(self, depth);
        for child in self.children() {
            child.walk_at(depth + 1, f);
        }
    }
}

/// Find `key` in a forest of menu trees
pub fn find_in_menu<'a>(nodes: &'a [MenuNode], key: &str) -> Option<&'a MenuNode> {
    nodes.iter().find_map(|node| node.find(key))
}

/// How UI animations are driven
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationMode {
    #[serde(rename = "CSS")]
    Css,
    #[serde(rename = "Web Animations API")]
    WebAnimationsApi,
    #[serde(rename = "requestAnimationFrame")]
    RequestAnimationFrame,
}

impl AnimationMode {
    pub const ALL: [AnimationMode; 3] = [
        AnimationMode::Css,
        AnimationMode::WebAnimationsApi,
        AnimationMode::RequestAnimationFrame,
    ];

    /// The wire string of this mode
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationMode::Css => "CSS",
            AnimationMode::WebAnimationsApi => "Web Animations API",
            AnimationMode::RequestAnimationFrame => "requestAnimationFrame",
        }
    }
}

impl fmt::Display for AnimationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown animation mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAnimationMode(pub String);

impl fmt::Display for UnknownAnimationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown animation mode: {:?}", self.0)
    }
}

impl std::error::Error for UnknownAnimationMode {}

impl FromStr for AnimationMode {
    type Err = UnknownAnimationMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnimationMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| UnknownAnimationMode(s.to_string()))
    }
}
