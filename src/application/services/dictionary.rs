//! Dictionary service
//!
//! Command interface used by the presentation layer: text changes ask for
//! suggestions, insert/remove mutate the word tree and persist it.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::{ApplicationResult, DomainResultExt, IoResultExt};
use crate::domain::WordTree;
use crate::infrastructure::traits::FileSystem;

/// Words used when no dictionary file exists yet.
pub const DEFAULT_SEED_WORDS: [&str; 15] = [
    "casa",
    "carro",
    "cachorro",
    "cadeira",
    "caneta",
    "mesa",
    "mala",
    "computador",
    "telefone",
    "livro",
    "janela",
    "porta",
    "teclado",
    "mouse",
    "monitor",
];

/// How to open a dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryOptions {
    /// Backing word list file
    pub path: PathBuf,
    /// Words inserted when `path` does not exist
    pub seed_words: Vec<String>,
    /// Persist after every successful insert/remove/import
    pub autosave: bool,
}

impl DictionaryOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            seed_words: DEFAULT_SEED_WORDS.iter().map(|w| w.to_string()).collect(),
            autosave: true,
        }
    }
}

/// Service wrapping a [`WordTree`] and its backing file.
pub struct DictionaryService {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    autosave: bool,
    seeded: bool,
    dirty: bool,
    tree: WordTree,
}

impl DictionaryService {
    /// Load the dictionary file, or seed a fresh tree if it does not exist.
    ///
    /// A seeded dictionary counts as unsaved until the first save.
    pub fn open(fs: Arc<dyn FileSystem>, options: DictionaryOptions) -> ApplicationResult<Self> {
        let DictionaryOptions {
            path,
            seed_words,
            autosave,
        } = options;
        debug!("open: path={}", path.display());

        let mut tree = WordTree::new();
        let seeded = if fs.exists(&path) {
            let reader = fs
                .open_read(&path)
                .with_path_context("read dictionary", &path)?;
            tree.load_from(reader)
                .with_path_context("read dictionary", &path)?;
            false
        } else {
            info!(
                "dictionary {} not found, seeding {} words",
                path.display(),
                seed_words.len()
            );
            tree.extend(&seed_words);
            true
        };

        Ok(Self {
            fs,
            path,
            autosave,
            seeded,
            dirty: seeded,
            tree,
        })
    }

    pub fn tree(&self) -> &WordTree {
        &self.tree
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True if the tree was built from seed words instead of the file.
    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    /// True if the tree holds changes not yet written to the file.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Suggestions for the current input text (trimmed). Empty text yields none.
    pub fn on_text_changed(&self, text: &str) -> Vec<String> {
        let prefix = text.trim();
        if prefix.is_empty() {
            return Vec::new();
        }
        self.tree.prefix_search(prefix)
    }

    /// Insert a word (trimmed). Empty input is ignored and never touches storage.
    ///
    /// Returns whether the word was new.
    #[instrument(level = "debug", skip(self))]
    pub fn on_insert(&mut self, word: &str) -> ApplicationResult<bool> {
        let word = word.trim();
        if word.is_empty() {
            debug!("on_insert: ignoring empty word");
            return Ok(false);
        }
        let added = self.tree.insert(word);
        self.mark_changed(added)?;
        Ok(added)
    }

    /// Remove a word (trimmed). Empty input is ignored and never touches storage.
    ///
    /// Returns whether the word was present.
    #[instrument(level = "debug", skip(self))]
    pub fn on_remove(&mut self, word: &str) -> ApplicationResult<bool> {
        let word = word.trim();
        if word.is_empty() {
            debug!("on_remove: ignoring empty word");
            return Ok(false);
        }
        let removed = self.tree.remove(word);
        self.mark_changed(removed)?;
        Ok(removed)
    }

    /// All words in ascending order.
    pub fn all_words(&self) -> Vec<String> {
        self.tree.in_order()
    }

    /// Merge the words of another word list file into the dictionary.
    ///
    /// Returns the number of words that were new. If reading stops part way,
    /// the words read before the failing line stay in the dictionary as
    /// unsaved changes.
    #[instrument(level = "debug", skip(self))]
    pub fn import(&mut self, source: &Path) -> ApplicationResult<usize> {
        let reader = self
            .fs
            .open_read(source)
            .with_path_context("read word list", source)?;
        let before = self.tree.len();
        let added = match self.tree.load_from(reader) {
            Ok(added) => added,
            Err(e) => {
                if self.tree.len() != before {
                    self.dirty = true;
                }
                return Err::<usize, _>(e).with_path_context("read word list", source);
            }
        };
        self.mark_changed(added > 0)?;
        Ok(added)
    }

    /// Write the ascending word list to `sink`.
    pub fn export<W: Write>(&self, sink: W) -> ApplicationResult<()> {
        self.tree.save_to(sink)?;
        Ok(())
    }

    /// Write the ascending word list to `target` without changing the dictionary path.
    pub fn export_to(&self, target: &Path) -> ApplicationResult<()> {
        self.write_word_list(target)
    }

    /// Rewrite the dictionary file with the full word list.
    #[instrument(level = "debug", skip(self))]
    pub fn save(&mut self) -> ApplicationResult<()> {
        self.write_word_list(&self.path)?;
        self.dirty = false;
        self.seeded = false;
        info!("saved {} words to {}", self.tree.len(), self.path.display());
        Ok(())
    }

    /// Save only if there are unsaved changes. Returns whether a save happened.
    pub fn persist_if_dirty(&mut self) -> ApplicationResult<bool> {
        if !self.dirty {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    fn mark_changed(&mut self, changed: bool) -> ApplicationResult<()> {
        if changed {
            self.dirty = true;
        }
        if self.autosave {
            self.persist_if_dirty()?;
        }
        Ok(())
    }

    fn write_word_list(&self, target: &Path) -> ApplicationResult<()> {
        let mut buffer = Vec::with_capacity(self.tree.len() * 8);
        self.tree.save_to(&mut buffer)?;

        self.fs
            .ensure_parent(target)
            .with_path_context("create parent directory", target)?;
        self.fs
            .write_atomic(target, &buffer)
            .with_path_context("write word list", target)?;
        Ok(())
    }
}
