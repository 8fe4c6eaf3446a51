//! Height-balanced (AVL) word tree
//!
//! Stores distinct words in ascending `str` order. Every structural change is
//! followed by a bottom-up rebalance on the way back out of the recursion, so
//! for every node `|height(left) - height(right)| <= 1` holds between calls.

use std::cmp::Ordering;
use std::io::{BufRead, Write};

use tracing::{debug, instrument, trace};

use super::error::{DomainError, DomainResult};
use super::node::{height, Link, Node};

/// Ordered set of distinct words backed by an AVL tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordTree {
    root: Link,
    len: usize,
}

impl WordTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored words.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the whole tree, 0 when empty.
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_deref()
    }

    /// Adds `word` unless already present. Empty words are ignored.
    ///
    /// Returns `true` if the tree changed.
    #[instrument(level = "trace", skip(self))]
    pub fn insert(&mut self, word: &str) -> bool {
        if word.is_empty() {
            return false;
        }
        let (root, inserted) = insert_into(self.root.take(), word);
        self.root = Some(root);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Deletes `word` if present.
    ///
    /// A node with two children takes over the value of its in-order
    /// successor, which is then removed from the right subtree.
    /// Returns `true` if the tree changed.
    #[instrument(level = "trace", skip(self))]
    pub fn remove(&mut self, word: &str) -> bool {
        let (root, removed) = remove_from(self.root.take(), word);
        self.root = root;
        if removed {
            self.len -= 1;
        }
        removed
    }

    pub fn contains(&self, word: &str) -> bool {
        let mut current = self.root();
        while let Some(node) = current {
            current = match word.cmp(node.value()) {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => return true,
            };
        }
        false
    }

    /// Ascending iterator over the stored words.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self.root())
    }

    /// All words in ascending order.
    pub fn in_order(&self) -> Vec<String> {
        self.iter().map(str::to_string).collect()
    }

    /// Words starting with `prefix`.
    ///
    /// Visits each node before its subtrees: emits the node's word when it
    /// matches, descends left only if `prefix` sorts before the node's word,
    /// and always descends right. Results come back in that visiting order,
    /// not in ascending order.
    #[instrument(level = "trace", skip(self))]
    pub fn prefix_search(&self, prefix: &str) -> Vec<String> {
        let mut found = Vec::new();
        if prefix.is_empty() {
            return found;
        }
        if let Some(root) = self.root() {
            collect_prefixed(root, prefix, &mut found);
        }
        trace!("prefix {:?}: {} matches", prefix, found.len());
        found
    }

    /// Inserts every non-blank line of `source`, trimmed.
    ///
    /// Returns the number of words that were not already present. On a read
    /// error the words inserted so far stay in the tree.
    pub fn load_from<R: BufRead>(&mut self, source: R) -> DomainResult<usize> {
        let mut added = 0;
        for (idx, line) in source.lines().enumerate() {
            let line = line.map_err(|source| DomainError::Read {
                line: idx + 1,
                source,
            })?;
            let word = line.trim();
            if word.is_empty() {
                continue;
            }
            if self.insert(word) {
                added += 1;
            }
        }
        debug!("load_from: added {} words, total {}", added, self.len);
        Ok(added)
    }

    /// Writes all words in ascending order, one per line, newline-terminated.
    pub fn save_to<W: Write>(&self, mut sink: W) -> DomainResult<()> {
        for word in self.iter() {
            writeln!(sink, "{}", word).map_err(DomainError::Write)?;
        }
        sink.flush().map_err(DomainError::Write)?;
        debug!("save_to: wrote {} words", self.len);
        Ok(())
    }

    /// Verifies cached heights, AVL balance, strict ordering and the word count.
    pub fn check_invariants(&self) -> DomainResult<()> {
        check_node(&self.root)?;

        let mut count = 0;
        let mut previous: Option<&str> = None;
        for word in self.iter() {
            if let Some(prev) = previous {
                if prev >= word {
                    return Err(DomainError::OutOfOrder {
                        previous: prev.to_string(),
                        next: word.to_string(),
                    });
                }
            }
            previous = Some(word);
            count += 1;
        }

        if count != self.len {
            return Err(DomainError::CountMismatch {
                cached: self.len,
                actual: count,
            });
        }
        Ok(())
    }
}

impl<S: AsRef<str>> FromIterator<S> for WordTree {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tree = WordTree::new();
        tree.extend(iter);
        tree
    }
}

impl<S: AsRef<str>> Extend<S> for WordTree {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for word in iter {
            self.insert(word.as_ref());
        }
    }
}

impl<'a> IntoIterator for &'a WordTree {
    type Item = &'a str;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator, keeps the path of pending ancestors on a stack.
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iter<'a> {
    fn new(root: Option<&'a Node>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a Node>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right());
        Some(node.value())
    }
}

fn insert_into(link: Link, word: &str) -> (Box<Node>, bool) {
    let mut node = match link {
        None => return (Box::new(Node::new(word)), true),
        Some(node) => node,
    };

    let inserted = match word.cmp(node.value.as_str()) {
        Ordering::Less => {
            let (left, inserted) = insert_into(node.left.take(), word);
            node.left = Some(left);
            inserted
        }
        Ordering::Greater => {
            let (right, inserted) = insert_into(node.right.take(), word);
            node.right = Some(right);
            inserted
        }
        Ordering::Equal => false,
    };

    if inserted {
        (rebalance(node), true)
    } else {
        (node, false)
    }
}

fn remove_from(link: Link, word: &str) -> (Link, bool) {
    let Some(mut node) = link else {
        return (None, false);
    };

    let removed = match word.cmp(node.value.as_str()) {
        Ordering::Less => {
            let (left, removed) = remove_from(node.left.take(), word);
            node.left = left;
            removed
        }
        Ordering::Greater => {
            let (right, removed) = remove_from(node.right.take(), word);
            node.right = right;
            removed
        }
        Ordering::Equal => match (node.left.take(), node.right.take()) {
            (None, right) => return (right, true),
            (left, None) => return (left, true),
            (Some(left), Some(right)) => {
                let successor = min_value(&right).to_string();
                trace!("promoting successor {:?} over {:?}", successor, node.value);
                let (right, _) = remove_from(Some(right), &successor);
                node.left = Some(left);
                node.right = right;
                node.value = successor;
                true
            }
        },
    };

    if removed {
        (Some(rebalance(node)), true)
    } else {
        (Some(node), false)
    }
}

fn min_value(node: &Node) -> &str {
    let mut current = node;
    while let Some(left) = current.left() {
        current = left;
    }
    current.value()
}

/// Restores the AVL property at `node`, assuming both subtrees satisfy it.
///
/// The single vs. double rotation choice uses the heavy child's own balance
/// factor, which works for deletions as well as insertions.
fn rebalance(mut node: Box<Node>) -> Box<Node> {
    node.update_height();
    let balance = node.balance_factor();

    if balance > 1 {
        if let Some(left) = node.left.take() {
            node.left = Some(if left.balance_factor() < 0 {
                rotate_left(left)
            } else {
                left
            });
        }
        return rotate_right(node);
    }
    if balance < -1 {
        if let Some(right) = node.right.take() {
            node.right = Some(if right.balance_factor() > 0 {
                rotate_right(right)
            } else {
                right
            });
        }
        return rotate_left(node);
    }
    node
}

fn rotate_right(mut y: Box<Node>) -> Box<Node> {
    let Some(mut x) = y.left.take() else {
        return y;
    };
    trace!("rotate right at {:?}", y.value);
    y.left = x.right.take();
    y.update_height();
    x.right = Some(y);
    x.update_height();
    x
}

fn rotate_left(mut x: Box<Node>) -> Box<Node> {
    let Some(mut y) = x.right.take() else {
        return x;
    };
    trace!("rotate left at {:?}", x.value);
    x.right = y.left.take();
    x.update_height();
    y.left = Some(x);
    y.update_height();
    y
}

fn collect_prefixed(node: &Node, prefix: &str, found: &mut Vec<String>) {
    if node.value.starts_with(prefix) {
        found.push(node.value.clone());
    }
    if prefix < node.value.as_str() {
        if let Some(left) = node.left() {
            collect_prefixed(left, prefix, found);
        }
    }
    if let Some(right) = node.right() {
        collect_prefixed(right, prefix, found);
    }
}

/// Returns the actual height of the subtree after validating it.
fn check_node(link: &Link) -> DomainResult<usize> {
    let Some(node) = link else {
        return Ok(0);
    };
    let left = check_node(&node.left)?;
    let right = check_node(&node.right)?;

    let actual = 1 + left.max(right);
    if node.height != actual {
        return Err(DomainError::StaleHeight {
            word: node.value.clone(),
            cached: node.height,
            actual,
        });
    }
    if left.abs_diff(right) > 1 {
        return Err(DomainError::Unbalanced {
            word: node.value.clone(),
            left,
            right,
        });
    }
    Ok(actual)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::{self, Cursor};

    fn tree_of(words: &[&str]) -> WordTree {
        words.iter().collect()
    }

    fn child_values(node: &Node) -> (Option<&str>, Option<&str>) {
        (node.left().map(Node::value), node.right().map(Node::value))
    }

    #[test]
    fn given_b_a_c_when_inserting_then_b_is_root_without_rotation() {
        let tree = tree_of(&["b", "a", "c"]);

        assert_eq!(tree.in_order(), vec!["a", "b", "c"]);
        let root = tree.root().unwrap();
        assert_eq!(root.value(), "b");
        assert_eq!(child_values(root), (Some("a"), Some("c")));
        tree.check_invariants().unwrap();
    }

    #[test]
    fn given_ascending_words_when_inserting_then_rotates_left() {
        let tree = tree_of(&["a", "b", "c"]);

        assert_eq!(tree.in_order(), vec!["a", "b", "c"]);
        let root = tree.root().unwrap();
        assert_eq!(root.value(), "b");
        assert_eq!(root.height(), 2);
        assert!(root.left().unwrap().is_leaf());
        assert!(root.right().unwrap().is_leaf());
    }

    #[test]
    fn given_descending_words_when_inserting_then_rotates_right() {
        let tree = tree_of(&["c", "b", "a"]);

        let root = tree.root().unwrap();
        assert_eq!(root.value(), "b");
        assert_eq!(child_values(root), (Some("a"), Some("c")));
    }

    #[rstest]
    #[case::left_right(&["c", "a", "b"])]
    #[case::right_left(&["a", "c", "b"])]
    fn given_zigzag_insert_when_inserting_then_double_rotation_centers_b(#[case] words: &[&str]) {
        let tree = tree_of(words);

        let root = tree.root().unwrap();
        assert_eq!(root.value(), "b");
        assert_eq!(child_values(root), (Some("a"), Some("c")));
        tree.check_invariants().unwrap();
    }

    #[test]
    fn given_duplicate_insert_then_tree_is_unchanged() {
        let mut tree = tree_of(&["mesa", "casa", "livro"]);
        let before = tree.clone();

        assert!(!tree.insert("casa"));

        assert_eq!(tree, before);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn given_empty_word_when_inserting_then_ignored() {
        let mut tree = WordTree::new();
        assert!(!tree.insert(""));
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
    }

    #[test]
    fn given_five_words_when_removing_middle_then_remaining_stay_balanced() {
        let mut tree = tree_of(&["a", "b", "c", "d", "e"]);

        assert!(tree.remove("c"));

        assert_eq!(tree.in_order(), vec!["a", "b", "d", "e"]);
        assert_eq!(tree.len(), 4);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn given_root_with_two_children_when_removing_then_successor_takes_its_place() {
        // b(a, d(c, e))
        let mut tree = tree_of(&["a", "b", "c", "d", "e"]);
        assert_eq!(tree.root().unwrap().value(), "b");

        assert!(tree.remove("b"));

        let root = tree.root().unwrap();
        assert_eq!(root.value(), "c");
        assert_eq!(tree.in_order(), vec!["a", "c", "d", "e"]);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn given_removal_that_unbalances_when_removing_then_rotates() {
        // c(b(a), d): removing d leaves c left-heavy by 2
        let mut tree = tree_of(&["c", "b", "d", "a"]);

        tree.remove("d");

        let root = tree.root().unwrap();
        assert_eq!(root.value(), "b");
        assert_eq!(child_values(root), (Some("a"), Some("c")));
        tree.check_invariants().unwrap();
    }

    #[test]
    fn given_removal_with_balanced_sibling_when_removing_then_single_rotation() {
        // c(b(a, bb), d): left child balance is 0 after removing d
        let mut tree = tree_of(&["c", "b", "d", "a", "bb"]);

        tree.remove("d");

        let root = tree.root().unwrap();
        assert_eq!(root.value(), "b");
        assert_eq!(root.right().map(Node::value), Some("c"));
        assert_eq!(
            root.right().and_then(Node::left).map(Node::value),
            Some("bb")
        );
        tree.check_invariants().unwrap();
    }

    #[rstest]
    #[case::empty_tree(&[], "x")]
    #[case::absent_word(&["a", "b", "c"], "zzz")]
    fn given_missing_word_when_removing_then_nothing_changes(
        #[case] words: &[&str],
        #[case] missing: &str,
    ) {
        let mut tree = tree_of(words);
        let before = tree.in_order();

        assert!(!tree.remove(missing));

        assert_eq!(tree.in_order(), before);
    }

    #[test]
    fn given_words_when_prefix_search_then_follows_traversal_order() {
        // carro(cachorro, casa(_, mesa))
        let tree = tree_of(&["casa", "carro", "cachorro", "mesa"]);

        let found = tree.prefix_search("ca");

        assert_eq!(found, vec!["carro", "cachorro", "casa"]);
    }

    #[rstest]
    #[case::empty_prefix("")]
    #[case::no_match("z")]
    fn given_prefix_without_matches_then_returns_empty(#[case] prefix: &str) {
        let tree = tree_of(&["casa", "carro", "mesa"]);
        assert!(tree.prefix_search(prefix).is_empty());
    }

    #[test]
    fn given_exact_word_as_prefix_then_it_is_found() {
        let tree = tree_of(&["mesa", "mesas", "mala"]);

        let mut found = tree.prefix_search("mesa");
        found.sort();

        assert_eq!(found, vec!["mesa", "mesas"]);
    }

    #[test]
    fn given_contains_then_matches_membership() {
        let tree = tree_of(&["porta", "janela", "teclado"]);
        assert!(tree.contains("janela"));
        assert!(!tree.contains("jane"));
    }

    #[test]
    fn given_source_with_blank_lines_when_loading_then_skips_them() {
        let mut tree = WordTree::new();

        let added = tree.load_from(Cursor::new("word1\n\nword2\n")).unwrap();

        assert_eq!(added, 2);
        assert_eq!(tree.in_order(), vec!["word1", "word2"]);
    }

    #[test]
    fn given_padded_and_duplicate_lines_when_loading_then_trims_and_dedups() {
        let mut tree = tree_of(&["beta"]);

        let added = tree
            .load_from(Cursor::new("  alpha \r\n\t\nbeta\nalpha"))
            .unwrap();

        assert_eq!(added, 1);
        assert_eq!(tree.in_order(), vec!["alpha", "beta"]);
    }

    #[test]
    fn given_invalid_utf8_when_loading_then_reports_line_and_keeps_prior_words() {
        let mut tree = WordTree::new();
        let source: &[u8] = b"first\nsecond\n\xff\xfe\nfourth\n";

        let err = tree.load_from(source).unwrap_err();

        assert!(matches!(err, DomainError::Read { line: 3, .. }));
        assert!(!err.is_invariant_violation());
        assert_eq!(tree.in_order(), vec!["first", "second"]);
    }

    #[test]
    fn given_tree_when_saving_then_writes_sorted_lines() {
        let tree = tree_of(&["mouse", "livro", "monitor"]);
        let mut sink = Vec::new();

        tree.save_to(&mut sink).unwrap();

        assert_eq!(String::from_utf8(sink).unwrap(), "livro\nmonitor\nmouse\n");
    }

    #[test]
    fn given_empty_tree_when_saving_then_writes_nothing() {
        let mut sink = Vec::new();
        WordTree::new().save_to(&mut sink).unwrap();
        assert!(sink.is_empty());
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn given_failing_sink_when_saving_then_returns_write_error() {
        let tree = tree_of(&["a"]);
        let err = tree.save_to(BrokenSink).unwrap_err();
        assert!(matches!(err, DomainError::Write(_)));
    }

    #[test]
    fn given_corrupted_height_when_checking_then_reports_stale_height() {
        let mut tree = tree_of(&["b", "a", "c"]);
        if let Some(root) = tree.root.as_mut() {
            root.height = 5;
        }

        let err = tree.check_invariants().unwrap_err();

        assert!(matches!(err, DomainError::StaleHeight { cached: 5, actual: 2, .. }));
        assert!(err.is_invariant_violation());
    }

    #[test]
    fn given_swapped_values_when_checking_then_reports_out_of_order() {
        let mut tree = tree_of(&["b", "a", "c"]);
        if let Some(root) = tree.root.as_mut() {
            root.value = "z".to_string();
        }

        let err = tree.check_invariants().unwrap_err();

        assert!(matches!(err, DomainError::OutOfOrder { .. }));
    }

    #[test]
    fn given_iter_then_yields_ascending_borrowed_words() {
        let tree = tree_of(&["telefone", "casa", "mala", "computador"]);
        let words: Vec<&str> = (&tree).into_iter().collect();
        assert_eq!(words, vec!["casa", "computador", "mala", "telefone"]);
    }
}
