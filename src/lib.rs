//! wordtree: an alphabetically ordered word dictionary with prefix suggestions.
//!
//! Words live in a height-balanced (AVL) binary search tree
//! ([`domain::WordTree`]) and are persisted as a plain text file with one
//! word per line. The [`application::services::DictionaryService`] is the
//! command interface the CLI and the interactive shell call into.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{DomainError, Node, WordTree};
