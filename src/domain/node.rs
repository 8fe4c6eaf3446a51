//! Tree node: one stored word plus its owned subtrees

/// Owned link to a subtree. `None` is an empty subtree of height 0.
pub(crate) type Link = Option<Box<Node>>;

/// A single word in the tree.
///
/// Each node exclusively owns both children. The cached `height` is kept
/// equal to `1 + max(height(left), height(right))` by the tree algorithms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) value: String,
    pub(crate) left: Link,
    pub(crate) right: Link,
    pub(crate) height: usize,
}

impl Node {
    /// New leaf: height 1, no children.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            left: None,
            right: None,
            height: 1,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn left(&self) -> Option<&Node> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&Node> {
        self.right.as_deref()
    }

    /// Cached height of the subtree rooted here (leaf = 1).
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Height of the left subtree minus height of the right subtree.
    pub fn balance_factor(&self) -> isize {
        height(&self.left) as isize - height(&self.right) as isize
    }

    pub(crate) fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }
}

pub(crate) fn height(link: &Link) -> usize {
    link.as_ref().map_or(0, |node| node.height)
}
