//! Command-line argument parsing and help for pusher.
//!
//! When invoked with no flags, pusher launches the file-selection TUI
//! straight away (after the first-run configuration flow if no roots are
//! stored yet).

/// Flags that shape one run.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunOptions {
    /// Compute and report the transfer without mutating anything.
    pub dry_run: bool,
    /// Symlink the selection into the destination instead of moving it.
    pub link: bool,
    /// Open the configuration screens before browsing.
    pub configure: bool,
}

pub enum CliAction {
    Run(RunOptions),
    Exit,
}

pub fn handle_args() -> CliAction {
    let mut opts = RunOptions::default();

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--version" | "-v" => {
                print_version();
                return CliAction::Exit;
            }
            "-h" | "--help" => {
                print_help();
                return CliAction::Exit;
            }
            "--dry-run" | "-n" => opts.dry_run = true,
            "--link" | "-l" => opts.link = true,
            "--configure" | "-c" => opts.configure = true,
            arg => {
                eprintln!("Unknown argument: {}", arg);
                eprintln!("Try --help for available options");
                return CliAction::Exit;
            }
        }
    }

    CliAction::Run(opts)
}

fn print_version() {
    println!("pusher {}", env!("CARGO_PKG_VERSION"));
}

fn print_help() {
    println!(
        r#"pusher - archive files from a source tree into a destination tree

USAGE:
  pushr [OPTIONS]

Browse the configured source directory, mark files or directories with
Space, and confirm with Enter. Marked paths are pushed to the destination
preserving their relative paths; directories the move empties out are
removed from the source afterwards.

OPTIONS:
  -n, --dry-run           Report what would be transferred without doing it
  -l, --link              Create symlinks at the destination instead of moving
  -c, --configure         Open the source/destination configuration screens
  -h, --help              Print help information
  -v, --version           Display the current installed version of pusher

ENVIRONMENT:
  PUSHER_CONFIG           Override the default config path
"#
    );
}
