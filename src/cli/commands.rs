//! Command dispatch: one function per subcommand

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::services::DictionaryService;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::shell::run_shell;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::TreeRender;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::SelectionItem;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `wordtree --help`".to_string(),
        ));
    };

    if let Commands::Completion { shell } = command {
        return completion(*shell);
    }

    let local_dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(|e| InfraError::io("current directory", e))?,
    };
    let mut settings = Settings::load(Some(local_dir.as_path()))?;
    if let Some(file) = &cli.file {
        settings.dictionary_path = file.clone();
    }
    debug!("dictionary: {}", settings.dictionary_path.display());
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Insert { words } => insert(&container, words),
        Commands::Remove { words } => remove(&container, words),
        Commands::List => list(&container),
        Commands::Suggest { prefix } => suggest(&container, prefix),
        Commands::Pick { prefix } => pick(&container, prefix),
        Commands::Tree => tree(&container),
        Commands::Check => check(&container),
        Commands::Import { file } => import(&container, file),
        Commands::Export { file } => export(&container, file.as_deref()),
        Commands::Shell => shell(&container),
        Commands::Info => info(&container),
        Commands::Config { command } => config(&container, command, &local_dir),
        Commands::Completion { .. } => Ok(()),
    }
}

fn completion(shell: clap_complete::Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}

#[instrument(skip(container))]
fn insert(container: &ServiceContainer, words: &[String]) -> CliResult<()> {
    let mut dict = container.dictionary()?;
    for word in words {
        let word = word.trim();
        if word.is_empty() {
            output::warning("skipping empty word");
        } else if dict.on_insert(word)? {
            output::success(&format!("inserted '{}'", word));
        } else {
            output::skipped(&format!("'{}' already present", word));
        }
    }
    dict.persist_if_dirty()?;
    Ok(())
}

#[instrument(skip(container))]
fn remove(container: &ServiceContainer, words: &[String]) -> CliResult<()> {
    let mut dict = container.dictionary()?;
    for word in words {
        let word = word.trim();
        if word.is_empty() {
            output::warning("skipping empty word");
        } else if dict.on_remove(word)? {
            output::success(&format!("removed '{}'", word));
        } else {
            output::skipped(&format!("'{}' not found", word));
        }
    }
    dict.persist_if_dirty()?;
    Ok(())
}

#[instrument(skip(container))]
fn list(container: &ServiceContainer) -> CliResult<()> {
    let dict = container.dictionary()?;
    for word in dict.tree() {
        output::info(word);
    }
    Ok(())
}

#[instrument(skip(container))]
fn suggest(container: &ServiceContainer, prefix: &str) -> CliResult<()> {
    let dict = container.dictionary()?;
    let suggestions = dict.on_text_changed(prefix);
    if suggestions.is_empty() {
        output::warning(&format!("no suggestions for '{}'", prefix.trim()));
    }
    for word in suggestions {
        output::info(&word);
    }
    Ok(())
}

#[instrument(skip(container))]
fn pick(container: &ServiceContainer, prefix: &str) -> CliResult<()> {
    let dict = container.dictionary()?;
    let items: Vec<SelectionItem> = dict
        .on_text_changed(prefix)
        .into_iter()
        .map(SelectionItem::word)
        .collect();
    if items.is_empty() {
        output::warning(&format!("no suggestions for '{}'", prefix.trim()));
        return Ok(());
    }

    let selected = container
        .selector
        .select_one(&items, "word> ")
        .map_err(|message| InfraError::Selector { message })?;
    match selected {
        Some(item) => output::info(&item.value),
        None => debug!("pick: cancelled"),
    }
    Ok(())
}

#[instrument(skip(container))]
fn tree(container: &ServiceContainer) -> CliResult<()> {
    let dict = container.dictionary()?;
    output::info(&dict.tree().to_tree_string());
    Ok(())
}

#[instrument(skip(container))]
fn check(container: &ServiceContainer) -> CliResult<()> {
    let dict = container.dictionary()?;
    let tree = dict.tree();
    tree.check_invariants()?;
    output::success(&format!(
        "{} words, height {}: balanced and ordered",
        tree.len(),
        tree.height()
    ));
    Ok(())
}

#[instrument(skip(container))]
fn import(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let mut dict = container.dictionary()?;
    let added = dict.import(file)?;
    dict.persist_if_dirty()?;
    output::success(&format!(
        "imported {} new words from {} ({} total)",
        added,
        file.display(),
        dict.len()
    ));
    Ok(())
}

#[instrument(skip(container))]
fn export(container: &ServiceContainer, file: Option<&Path>) -> CliResult<()> {
    let dict = container.dictionary()?;
    match file {
        Some(path) => {
            dict.export_to(path)?;
            output::success(&format!("exported {} words to {}", dict.len(), path.display()));
        }
        None => dict.export(io::stdout().lock())?,
    }
    Ok(())
}

#[instrument(skip(container))]
fn shell(container: &ServiceContainer) -> CliResult<()> {
    let mut dict = container.dictionary()?;
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    if interactive {
        output::header("wordtree shell (? for help, :q to quit)");
    }
    run_shell(&mut dict, stdin.lock(), io::stdout().lock(), interactive)
}

#[instrument(skip(container))]
fn info(container: &ServiceContainer) -> CliResult<()> {
    let dict = container.dictionary()?;
    print_info(&dict, container.settings.autosave);
    Ok(())
}

fn print_info(dict: &DictionaryService, autosave: bool) {
    output::header("Dictionary");
    output::action("path", &dict.path().display());
    output::action("words", &dict.len());
    output::action("height", &dict.tree().height());
    output::action("seeded", &if dict.is_seeded() { "yes" } else { "no" });
    output::action("autosave", &if autosave { "on" } else { "off" });
}

#[instrument(skip(container))]
fn config(
    container: &ServiceContainer,
    command: &ConfigCommands,
    local_dir: &Path,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Init { global } => {
            let target: PathBuf = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                local_config_path(local_dir)
            };
            if container.fs.exists(&target) {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    target.display()
                )));
            }
            container
                .fs
                .ensure_parent(&target)
                .map_err(|e| InfraError::io(format!("create {}", target.display()), e))?;
            container
                .fs
                .write(&target, &Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", target.display()), e))?;
            output::success(&format!("created {}", target.display()));
        }
        ConfigCommands::Path => {
            let global = global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(unavailable)".to_string());
            output::action("global", &global);
            output::action("local", &local_config_path(local_dir).display());
            output::action("dictionary", &container.settings.dictionary_path.display());
        }
    }
    Ok(())
}
