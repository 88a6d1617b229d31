//! main.rs
//! Entry point for pusher

pub(crate) mod app;
pub(crate) mod config;
pub(crate) mod core;
pub(crate) mod ui;
pub(crate) mod utils;

use crate::app::BrowserState;
use crate::config::Config;
use crate::core::selection::Mode;
use crate::core::terminal::{SessionEnd, run_session};
use crate::core::transfer::{self, TransferMode, TransferRequest};
use crate::utils::cli::{CliAction, handle_args};

use std::io;
use std::path::{Path, PathBuf};

fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let mut stdout = std::io::stdout();
        let _ = crossterm::execute!(
            stdout,
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::cursor::Show
        );

        eprintln!("\n[pusher] Error occurred: {}", info);

        #[cfg(debug_assertions)]
        {
            let bt = std::backtrace::Backtrace::force_capture();
            eprintln!("\nStack Backtrace:\n{}", bt);
        }
    }));

    let CliAction::Run(opts) = handle_args() else {
        return Ok(());
    };

    let mut config = Config::load();
    let mode = if opts.link {
        TransferMode::Link
    } else {
        TransferMode::Move
    };

    if opts.configure || config.source_dir().is_none() || config.dest_dir().is_none() {
        if !configure_roots(&mut config)? {
            println!("Configuration cancelled.");
            return Ok(());
        }
    }

    loop {
        let (Some(source), Some(dest)) = (config.source_dir(), config.dest_dir()) else {
            println!("Source and destination directories are not configured.");
            return Ok(());
        };
        let source = source.to_path_buf();
        let dest = dest.to_path_buf();

        let mut browser = BrowserState::new(source.clone(), Mode::FileSelection, mode);
        match run_session(&mut browser)? {
            SessionEnd::Settings => {
                // Roots may change; the session restarts with a fresh selection.
                if !configure_roots(&mut config)? {
                    println!("Configuration cancelled.");
                    return Ok(());
                }
            }
            SessionEnd::Cancelled => {
                println!("No files selected or operation cancelled.");
                return Ok(());
            }
            SessionEnd::Accepted => {
                let paths = browser.snapshot();
                println!("Pushing {} items...", paths.len());

                let request = TransferRequest::new(source, dest, paths, mode, opts.dry_run);
                match transfer::execute(&request) {
                    Ok(report) => {
                        if opts.dry_run {
                            for action in report.actions() {
                                println!("would {}", action);
                            }
                        } else if mode == TransferMode::Link {
                            // rsync narrates move mode by itself.
                            for action in report.actions() {
                                println!("{}", action);
                            }
                        }
                        for warning in report.warnings() {
                            eprintln!("warning: {}", warning);
                        }
                        println!("Done.");
                        return Ok(());
                    }
                    Err(e) => {
                        eprintln!("Error during transfer: {}", e);
                        std::process::exit(1);
                    }
                }
            }
        }
    }
}

/// Runs the two directory-picker sessions and persists the chosen roots.
/// Returns `false` when the user backed out of either picker.
fn configure_roots(config: &mut Config) -> io::Result<bool> {
    let Some(source) = pick_directory("Select source directory", config.source_dir())? else {
        return Ok(false);
    };
    config.set_source_dir(source);
    config.save()?;

    let Some(dest) = pick_directory("Select destination directory", config.dest_dir())? else {
        return Ok(false);
    };
    config.set_dest_dir(dest);
    config.save()?;
    Ok(true)
}

/// One directory-picker session rooted at the current value, the home
/// directory, or the filesystem root, in that order of preference.
fn pick_directory(title: &str, current: Option<&Path>) -> io::Result<Option<PathBuf>> {
    let root = current
        .filter(|p| p.is_dir())
        .map(Path::to_path_buf)
        .or_else(crate::utils::get_home)
        .unwrap_or_else(|| PathBuf::from(std::path::MAIN_SEPARATOR.to_string()));

    let mut browser =
        BrowserState::new(root, Mode::DirectoryPicker, TransferMode::Move).with_title(title);
    match run_session(&mut browser)? {
        SessionEnd::Accepted => Ok(browser.picked_dir()),
        _ => Ok(None),
    }
}
