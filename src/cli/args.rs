//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Word dictionary with prefix suggestions, backed by an AVL tree and a plain text file
#[derive(Parser, Debug)]
#[command(name = "wordtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Dictionary file (overrides config)
    #[arg(short, long, global = true, env = "WORDTREE_FILE", value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Directory holding a local .wordtree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add words to the dictionary
    Insert {
        /// Words to add
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Delete words from the dictionary
    Remove {
        /// Words to delete
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// List all words in order
    List,

    /// Show words starting with a prefix
    Suggest {
        /// Prefix to complete
        prefix: String,
    },

    /// Pick one suggestion interactively (fzf)
    Pick {
        /// Prefix to complete
        prefix: String,
    },

    /// Show the balanced tree structure
    Tree,

    /// Verify tree invariants
    Check,

    /// Merge words from another word list
    Import {
        /// Word list file (one word per line)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Write the word list to a file or stdout
    Export {
        /// Target file (default: stdout)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Interactive session: type to get suggestions, +word / -word to edit
    Shell,

    /// Show dictionary status
    Info,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
