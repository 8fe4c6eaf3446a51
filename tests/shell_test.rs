//! Tests for the interactive shell session

use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use wordtree::application::services::{DictionaryOptions, DictionaryService};
use wordtree::cli::shell::{run_shell, PROMPT};
use wordtree::infrastructure::traits::RealFileSystem;
use wordtree::util::testing;

fn service_with(path: &Path, content: &str, autosave: bool) -> DictionaryService {
    fs::write(path, content).unwrap();
    let options = DictionaryOptions {
        autosave,
        ..DictionaryOptions::new(path)
    };
    DictionaryService::open(Arc::new(RealFileSystem), options).unwrap()
}

fn run(service: &mut DictionaryService, input: &str) -> String {
    let mut out = Vec::new();
    run_shell(service, Cursor::new(input.to_string()), &mut out, false).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn given_text_when_typed_then_prints_suggestions() {
    testing::init_test_setup();
    let temp = TempDir::new().unwrap();
    let mut service = service_with(
        &temp.path().join("words.txt"),
        "casa\ncarro\ncachorro\nmesa\n",
        true,
    );

    let output = run(&mut service, "ca\n");

    let mut lines: Vec<&str> = output.lines().collect();
    lines.sort();
    assert_eq!(lines, vec!["cachorro", "carro", "casa"]);
}

#[test]
fn given_edit_commands_then_reports_and_persists() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("words.txt");
    let mut service = service_with(&path, "mesa\n", true);

    let output = run(&mut service, "+livro\n+mesa\n-porta\n-mesa\n*\n");

    assert_eq!(
        output,
        "inserted 'livro'\n'mesa' already present\n'porta' not found\nremoved 'mesa'\nlivro\n"
    );
    assert_eq!(fs::read_to_string(&path).unwrap(), "livro\n");
}

#[test]
fn given_autosave_off_when_session_ends_then_saves_once() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("words.txt");
    let mut service = service_with(&path, "mesa\n", false);

    let output = run(&mut service, "+janela\n");

    assert_eq!(output, "inserted 'janela'\n");
    assert_eq!(fs::read_to_string(&path).unwrap(), "janela\nmesa\n");
    assert!(!service.is_dirty());
}

#[test]
fn given_quit_then_remaining_input_is_ignored() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("words.txt");
    let mut service = service_with(&path, "mesa\n", true);

    let output = run(&mut service, ":q\n+ignored\n");

    assert!(output.is_empty());
    assert!(!service.tree().contains("ignored"));
}

#[test]
fn given_prompt_enabled_then_prompt_precedes_each_line() {
    let temp = TempDir::new().unwrap();
    let mut service = service_with(&temp.path().join("words.txt"), "mesa\n", true);
    let mut out = Vec::new();

    run_shell(&mut service, Cursor::new("me\n"), &mut out, true).unwrap();

    let output = String::from_utf8(out).unwrap();
    assert_eq!(output, format!("{PROMPT}mesa\n{PROMPT}"));
}

#[test]
fn given_bare_plus_then_nothing_is_inserted() {
    let temp = TempDir::new().unwrap();
    let mut service = service_with(&temp.path().join("words.txt"), "mesa\n", true);

    let output = run(&mut service, "+\n");

    assert_eq!(output, "nothing to insert\n");
    assert_eq!(service.len(), 1);
}

#[test]
fn given_escaped_line_then_text_with_command_prefix_is_completed() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("words.txt");
    let mut service = service_with(&path, "-ab\n-ac\nmesa\n", true);

    let output = run(&mut service, "\\-a\n");

    let mut lines: Vec<&str> = output.lines().collect();
    lines.sort();
    assert_eq!(lines, vec!["-ab", "-ac"]);
    assert_eq!(service.len(), 3);
}
