//! Session-level tests for the pusher browsing state machine.
//!
//! These drive [BrowserState] with synthetic key events against real
//! temporary directory trees, checking the selection and navigation
//! properties the transfer step depends on. Temporary resources are cleaned
//! up automatically after the tests complete.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pusher_tui::app::browser::{BrowserState, KeypressResult};
use pusher_tui::core::selection::{Mode, SelectionSet};
use pusher_tui::core::transfer::TransferMode;
use pusher_tui::core::{Entry, list};

use rand::rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use std::error;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn press(browser: &mut BrowserState, code: KeyCode) -> KeypressResult {
    browser.handle_keypress(KeyEvent::new(code, KeyModifiers::NONE))
}

fn move_to(browser: &mut BrowserState, name: &str) {
    let target = browser
        .entries()
        .iter()
        .position(|e| e.name_str() == name)
        .unwrap_or_else(|| panic!("entry '{}' not listed", name));
    while browser.cursor() > 0 {
        press(browser, KeyCode::Up);
    }
    for _ in 0..target {
        press(browser, KeyCode::Down);
    }
}

#[test]
fn toggle_parity_over_random_sequences() -> Result<(), Box<dyn error::Error>> {
    let names = ["alpha", "bravo", "charlie", "delta", "echo"];

    // A toggle sequence visiting paths in shuffled order, some odd, some even
    // times: exactly the odd ones must remain marked.
    let mut sequence: Vec<&str> = Vec::new();
    for (i, name) in names.iter().enumerate() {
        for _ in 0..=i {
            sequence.push(name);
        }
    }
    sequence.shuffle(&mut rng());

    let mut selection = SelectionSet::new();
    for name in &sequence {
        let entry = Entry::new(name.into(), 0);
        selection.toggle(Mode::FileSelection, PathBuf::from(name), &entry);
    }

    let expected: HashSet<&str> = names
        .iter()
        .enumerate()
        .filter(|(i, _)| (i + 1) % 2 == 1)
        .map(|(_, name)| *name)
        .collect();

    assert_eq!(selection.len(), expected.len());
    for name in expected {
        assert!(selection.contains(Path::new(name)), "missing {}", name);
    }
    Ok(())
}

#[test]
fn browser_double_toggle_clears_selection() -> Result<(), Box<dyn error::Error>> {
    let tmp = tempdir()?;
    File::create(tmp.path().join("one.txt"))?;
    File::create(tmp.path().join("two.txt"))?;

    let mut browser = BrowserState::new(
        tmp.path().to_path_buf(),
        Mode::FileSelection,
        TransferMode::Move,
    );

    move_to(&mut browser, "one.txt");
    press(&mut browser, KeyCode::Char(' '));
    move_to(&mut browser, "two.txt");
    press(&mut browser, KeyCode::Char(' '));
    assert_eq!(browser.selection().len(), 2);

    move_to(&mut browser, "one.txt");
    press(&mut browser, KeyCode::Char(' '));
    move_to(&mut browser, "one.txt");
    press(&mut browser, KeyCode::Char(' '));
    move_to(&mut browser, "two.txt");
    press(&mut browser, KeyCode::Char(' '));

    assert_eq!(browser.snapshot(), vec![PathBuf::from("one.txt")]);
    Ok(())
}

#[test]
fn picker_never_exceeds_one_selection() -> Result<(), Box<dyn error::Error>> {
    let tmp = tempdir()?;
    for name in ["north", "south", "east", "west"] {
        fs::create_dir(tmp.path().join(name))?;
    }
    File::create(tmp.path().join("stray.txt"))?;

    let mut browser = BrowserState::new(
        tmp.path().to_path_buf(),
        Mode::DirectoryPicker,
        TransferMode::Move,
    );

    // Toggle every row, files and synthetics included.
    let count = browser.entries().len();
    move_to(&mut browser, ".");
    for _ in 0..count {
        press(&mut browser, KeyCode::Char(' '));
        press(&mut browser, KeyCode::Down);
        assert!(browser.selection().len() <= 1);
    }
    assert_eq!(browser.selection().len(), 1);
    Ok(())
}

#[test]
fn repeated_round_trips_always_reset_position() -> Result<(), Box<dyn error::Error>> {
    let tmp = tempdir()?;
    let sub = tmp.path().join("subdir");
    fs::create_dir(&sub)?;
    for i in 0..20 {
        File::create(sub.join(format!("file_{:02}.txt", i)))?;
    }

    let mut browser = BrowserState::new(
        tmp.path().to_path_buf(),
        Mode::FileSelection,
        TransferMode::Move,
    );
    browser.set_page_rows(6);

    for _ in 0..50 {
        move_to(&mut browser, "subdir");
        press(&mut browser, KeyCode::Right);
        assert_eq!(browser.current_rel(), Path::new("subdir"));
        assert_eq!(browser.cursor(), 0);
        assert_eq!(browser.offset(), 0);

        // Scroll somewhere deep before leaving again.
        for _ in 0..12 {
            press(&mut browser, KeyCode::Down);
        }
        assert!(browser.offset() > 0);

        press(&mut browser, KeyCode::Left);
        assert_eq!(browser.current_rel(), Path::new("."));
        assert_eq!(browser.cursor(), 0);
        assert_eq!(browser.offset(), 0);
    }
    Ok(())
}

#[test]
fn quit_and_restart_never_leaks_selections() -> Result<(), Box<dyn error::Error>> {
    let tmp = tempdir()?;
    File::create(tmp.path().join("kept.txt"))?;
    File::create(tmp.path().join("marked.txt"))?;

    let mut first = BrowserState::new(
        tmp.path().to_path_buf(),
        Mode::FileSelection,
        TransferMode::Move,
    );
    move_to(&mut first, "marked.txt");
    press(&mut first, KeyCode::Char(' '));
    assert_eq!(press(&mut first, KeyCode::Char('q')), KeypressResult::Quit);
    drop(first);

    let mut second = BrowserState::new(
        tmp.path().to_path_buf(),
        Mode::FileSelection,
        TransferMode::Move,
    );
    assert!(second.selection().is_empty());

    // Confirming in the fresh session is still a no-op.
    assert_eq!(press(&mut second, KeyCode::Enter), KeypressResult::Continue);
    assert!(!second.is_confirming());
    Ok(())
}

#[test]
fn listing_reflects_external_changes_on_next_navigation() -> Result<(), Box<dyn error::Error>> {
    let tmp = tempdir()?;
    let sub = tmp.path().join("subdir");
    fs::create_dir(&sub)?;

    let mut browser = BrowserState::new(
        tmp.path().to_path_buf(),
        Mode::FileSelection,
        TransferMode::Move,
    );
    move_to(&mut browser, "subdir");
    press(&mut browser, KeyCode::Right);
    assert_eq!(browser.entries().len(), 2, "only '..' and '.'");

    // Another process drops a file in; the next re-list picks it up.
    File::create(sub.join("late.txt"))?;
    press(&mut browser, KeyCode::Left);
    move_to(&mut browser, "subdir");
    press(&mut browser, KeyCode::Right);
    assert!(browser.entries().iter().any(|e| e.name_str() == "late.txt"));
    Ok(())
}

#[test]
fn vanished_directory_lists_empty() -> Result<(), Box<dyn error::Error>> {
    let tmp = tempdir()?;
    let doomed = tmp.path().join("doomed");
    fs::create_dir(&doomed)?;

    let entries = list(tmp.path(), Path::new("doomed"));
    assert_eq!(entries.len(), 2);

    fs::remove_dir(&doomed)?;
    let entries = list(tmp.path(), Path::new("doomed"));
    assert!(entries.is_empty());
    Ok(())
}
