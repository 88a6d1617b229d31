//! The pusher transfer engine.
//!
//! Consumes the relative paths a browsing session produced and replicates
//! them under the destination root, either by moving (an external `rsync`
//! invocation with `--relative --remove-source-files`) or by creating
//! symbolic links pointing back at the source.
//!
//! Move mode is batch-level: one rsync process handles the whole list, its
//! output goes straight to the user's terminal, and a non-zero exit fails the
//! batch as a whole. A successful real move is followed by a bottom-up prune
//! of directories the move emptied out; prune failures are expected
//! steady-state (directory still holds something) and never surface.
//!
//! Link mode is per-item best-effort: a conflict or error on one path is
//! recorded as a warning and the rest of the batch continues.

use crate::core::index::resolve;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// How marked entries are carried over to the destination tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    /// Move via rsync, removing the sources and pruning emptied directories.
    Move,
    /// Leave sources in place and create symlinks at the destination.
    Link,
}

impl TransferMode {
    /// Short verb used in titles, prompts and action reports.
    pub fn label(&self) -> &'static str {
        match self {
            TransferMode::Move => "Push",
            TransferMode::Link => "Link",
        }
    }
}

/// One complete transfer order: built once from a finished browsing session,
/// consumed once by [execute].
#[derive(Debug)]
pub struct TransferRequest {
    source: PathBuf,
    dest: PathBuf,
    paths: Vec<PathBuf>,
    mode: TransferMode,
    dry_run: bool,
}

impl TransferRequest {
    pub fn new(
        source: PathBuf,
        dest: PathBuf,
        paths: Vec<PathBuf>,
        mode: TransferMode,
        dry_run: bool,
    ) -> Self {
        Self {
            source,
            dest,
            paths,
            mode,
            dry_run,
        }
    }

    #[inline]
    pub fn source(&self) -> &Path {
        &self.source
    }

    #[inline]
    pub fn dest(&self) -> &Path {
        &self.dest
    }

    #[inline]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    #[inline]
    pub fn mode(&self) -> TransferMode {
        self.mode
    }

    #[inline]
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }
}

/// Outcome of a transfer batch: the planned action list plus any per-item
/// warnings. A dry run reports the same actions as a real run would attempt.
#[derive(Debug, Default)]
pub struct TransferReport {
    actions: Vec<String>,
    warnings: Vec<String>,
}

impl TransferReport {
    #[inline]
    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    #[inline]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty() && self.warnings.is_empty()
    }
}

/// Runs one transfer batch.
///
/// An empty path list returns immediately without touching the filesystem or
/// spawning anything. Move-mode failures (rsync missing, non-zero exit) fail
/// the whole batch; rsync's own partial-completion semantics apply to
/// whatever it moved before failing, and the empty-directory prune is skipped
/// in that case. Link-mode failures are contained per item.
pub fn execute(request: &TransferRequest) -> io::Result<TransferReport> {
    let mut report = TransferReport::default();
    if request.paths.is_empty() {
        return Ok(report);
    }

    let verb = match request.mode {
        TransferMode::Move => "push",
        TransferMode::Link => "link",
    };
    for rel in &request.paths {
        report.actions.push(format!(
            "{} {} -> {}",
            verb,
            rel.display(),
            resolve(&request.dest, rel).display()
        ));
    }

    match request.mode {
        TransferMode::Move => run_move(request)?,
        TransferMode::Link => link_paths(request, &mut report),
    }
    Ok(report)
}

/// Invokes rsync once for the whole batch, working directory pinned to the
/// source root so `--relative` reproduces each path under the destination.
/// stdout/stderr are inherited; the user sees rsync's progress unparsed.
fn run_move(request: &TransferRequest) -> io::Result<()> {
    let mut cmd = Command::new("rsync");
    cmd.arg("-avP").arg("--remove-source-files").arg("--relative");
    if request.dry_run {
        cmd.arg("--dry-run");
    }
    cmd.args(&request.paths);
    cmd.arg(&request.dest);
    cmd.current_dir(&request.source);

    let status = match cmd.status() {
        Ok(status) => status,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(io::Error::other(
                "rsync was not found in PATH. Please install rsync",
            ));
        }
        Err(e) => return Err(io::Error::other(format!("Failed to spawn rsync: {}", e))),
    };

    if !status.success() {
        return Err(io::Error::other(format!("rsync failed: {}", status)));
    }

    if !request.dry_run {
        prune_empty_dirs(&request.source);
    }
    Ok(())
}

/// Removes every directory under `root` that the move left empty.
///
/// Children are visited before their parents so a chain of nested empties
/// collapses in one pass. `remove_dir` refuses non-empty directories, which
/// is exactly the skip behavior wanted; the root itself is never removed.
pub(crate) fn prune_empty_dirs(root: &Path) {
    let Ok(read) = fs::read_dir(root) else {
        return;
    };
    for entry in read.flatten() {
        if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
            prune_tree(&entry.path());
        }
    }
}

fn prune_tree(dir: &Path) {
    if let Ok(read) = fs::read_dir(dir) {
        for entry in read.flatten() {
            if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
                prune_tree(&entry.path());
            }
        }
    }
    // Fails while the directory still holds anything; that is the skip.
    let _ = fs::remove_dir(dir);
}

/// Creates one symlink per requested path, replicating the relative path
/// under the destination root. Sources are left untouched.
fn link_paths(request: &TransferRequest, report: &mut TransferReport) {
    for rel in &request.paths {
        if request.dry_run {
            continue;
        }
        let src = resolve(&request.source, rel);
        let dst = resolve(&request.dest, rel);
        if let Err(e) = link_one(&src, &dst, report) {
            report
                .warnings
                .push(format!("link {}: {}", rel.display(), e));
        }
    }
}

/// Links `dst -> src`, creating parent directories as needed. An existing
/// link at the destination is replaced; anything else already there is left
/// alone and reported.
fn link_one(src: &Path, dst: &Path, report: &mut TransferReport) -> io::Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }

    match fs::symlink_metadata(dst) {
        Ok(md) if md.file_type().is_symlink() => {
            fs::remove_file(dst)?;
        }
        Ok(_) => {
            report.warnings.push(format!(
                "{} already exists and is not a link, skipping",
                dst.display()
            ));
            return Ok(());
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    symlink(src, dst)
}

#[cfg(unix)]
fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

#[cfg(windows)]
fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
    if fs::metadata(src).map(|md| md.is_dir()).unwrap_or(false) {
        std::os::windows::fs::symlink_dir(src, dst)
    } else {
        std::os::windows::fs::symlink_file(src, dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn empty_request_is_a_noop() -> Result<(), Box<dyn std::error::Error>> {
        let src = tempdir()?;
        let dst = tempdir()?;
        // Would fail loudly if anything were spawned against these roots.
        let request = TransferRequest::new(
            src.path().to_path_buf(),
            dst.path().to_path_buf(),
            Vec::new(),
            TransferMode::Move,
            false,
        );
        let report = execute(&request)?;
        assert!(report.is_empty());
        Ok(())
    }

    #[test]
    fn prune_collapses_nested_empties_and_keeps_root() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempdir()?;
        fs::create_dir_all(tmp.path().join("a/b/c"))?;
        fs::create_dir_all(tmp.path().join("keep"))?;
        File::create(tmp.path().join("keep/file.txt"))?;

        prune_empty_dirs(tmp.path());

        assert!(!tmp.path().join("a").exists());
        assert!(tmp.path().join("keep/file.txt").exists());
        assert!(tmp.path().exists());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn link_creates_and_leaves_source_alone() -> Result<(), Box<dyn std::error::Error>> {
        let src = tempdir()?;
        let dst = tempdir()?;
        let mut file = File::create(src.path().join("x.txt"))?;
        writeln!(file, "payload")?;

        let request = TransferRequest::new(
            src.path().to_path_buf(),
            dst.path().to_path_buf(),
            vec![PathBuf::from("x.txt")],
            TransferMode::Link,
            false,
        );
        let report = execute(&request)?;

        assert!(report.warnings().is_empty());
        let target = fs::read_link(dst.path().join("x.txt"))?;
        assert_eq!(target, src.path().join("x.txt"));
        assert!(src.path().join("x.txt").exists());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn link_creates_intermediate_directories() -> Result<(), Box<dyn std::error::Error>> {
        let src = tempdir()?;
        let dst = tempdir()?;
        fs::create_dir_all(src.path().join("a/b"))?;
        File::create(src.path().join("a/b/deep.txt"))?;

        let request = TransferRequest::new(
            src.path().to_path_buf(),
            dst.path().to_path_buf(),
            vec![PathBuf::from("a/b/deep.txt")],
            TransferMode::Link,
            false,
        );
        let report = execute(&request)?;

        assert!(report.warnings().is_empty());
        assert!(dst.path().join("a/b/deep.txt").is_symlink());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn relink_replaces_existing_link() -> Result<(), Box<dyn std::error::Error>> {
        let src = tempdir()?;
        let dst = tempdir()?;
        File::create(src.path().join("x.txt"))?;
        std::os::unix::fs::symlink("/nonexistent/old", dst.path().join("x.txt"))?;

        let request = TransferRequest::new(
            src.path().to_path_buf(),
            dst.path().to_path_buf(),
            vec![PathBuf::from("x.txt")],
            TransferMode::Link,
            false,
        );
        let report = execute(&request)?;

        assert!(report.warnings().is_empty());
        let target = fs::read_link(dst.path().join("x.txt"))?;
        assert_eq!(target, src.path().join("x.txt"));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn link_conflict_is_skipped_with_one_warning() -> Result<(), Box<dyn std::error::Error>> {
        let src = tempdir()?;
        let dst = tempdir()?;
        File::create(src.path().join("x.txt"))?;
        let mut existing = File::create(dst.path().join("x.txt"))?;
        writeln!(existing, "do not touch")?;

        let request = TransferRequest::new(
            src.path().to_path_buf(),
            dst.path().to_path_buf(),
            vec![PathBuf::from("x.txt")],
            TransferMode::Link,
            false,
        );
        let report = execute(&request)?;

        assert_eq!(report.warnings().len(), 1);
        assert!(!dst.path().join("x.txt").is_symlink());
        assert_eq!(
            fs::read_to_string(dst.path().join("x.txt"))?,
            "do not touch\n"
        );
        Ok(())
    }

    #[test]
    fn dry_run_link_plans_without_mutating() -> Result<(), Box<dyn std::error::Error>> {
        let src = tempdir()?;
        let dst = tempdir()?;
        File::create(src.path().join("x.txt"))?;

        let dry = TransferRequest::new(
            src.path().to_path_buf(),
            dst.path().to_path_buf(),
            vec![PathBuf::from("x.txt")],
            TransferMode::Link,
            true,
        );
        let report = execute(&dry)?;

        assert_eq!(report.actions().len(), 1);
        assert!(report.actions()[0].starts_with("link x.txt -> "));
        assert!(!dst.path().join("x.txt").exists());

        let wet = TransferRequest::new(
            src.path().to_path_buf(),
            dst.path().to_path_buf(),
            vec![PathBuf::from("x.txt")],
            TransferMode::Link,
            false,
        );
        let wet_report = execute(&wet)?;
        assert_eq!(report.actions(), wet_report.actions());
        Ok(())
    }
}
