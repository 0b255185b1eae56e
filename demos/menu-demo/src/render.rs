//! Plain-text rendering of menu trees

use std::fmt::Write;

use ui_dispatch::MenuNode;

/// Render `nodes` as an indented tree, one node per line.
///
/// The node whose key equals `active_key` is prefixed with `*`. Branches
/// show a trailing `/`.
pub fn render_menu_tree(nodes: &[MenuNode], active_key: Option<&str>) -> String {
    let mut out = String::new();
    for root in nodes {
        root.walk(&mut |node: &MenuNode, depth: usize| {
            let marker = if Some(node.key.as_str()) == active_key {
                '*'
            } else {
                ' '
            };
            let suffix = if node.is_leaf() { "" } else { "/" };
            let _ = writeln!(
                out,
                "{}{} {}{} [{}]",
                "  ".repeat(depth),
                marker,
                node.text,
                suffix,
                node.key
            );
        });
    }
    out
}
