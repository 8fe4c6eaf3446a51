//! Structural rendering of the word tree for terminal display

use termtree::Tree;
use tracing::instrument;

use super::node::Node;
use super::tree::WordTree;

/// Placeholder label for the missing side of a node with a single child.
pub const EMPTY_CHILD: &str = "·";

pub trait TreeRender {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeRender for Node {
    fn to_tree_string(&self) -> Tree<String> {
        let label = format!("{} (h={})", self.value(), self.height());
        if self.is_leaf() {
            return Tree::new(label);
        }

        // Left child first, missing side shown explicitly so shape stays readable
        let leaves = [self.left(), self.right()]
            .into_iter()
            .map(|child| match child {
                Some(node) => node.to_tree_string(),
                None => Tree::new(EMPTY_CHILD.to_string()),
            })
            .collect::<Vec<_>>();

        Tree::new(label).with_leaves(leaves)
    }
}

impl TreeRender for WordTree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        match self.root() {
            Some(root) => root.to_tree_string(),
            None => Tree::new("Empty tree".to_string()),
        }
    }
}
