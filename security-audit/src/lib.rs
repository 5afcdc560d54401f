//! Heuristic security audit of a contract project: hardcoded secrets,
//! environment files, Solidity source patterns, dependency advisories and
//! configuration hygiene.
//!
//! The checks are independent: each one appends its findings to the
//! [`IssueReport`], and a check that cannot run is logged as skipped
//! without affecting the others.

use log::{info, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

mod checks;
pub mod report;

pub use report::{IssueReport, Severity};

/// Extensions of the script files scanned for secrets.
pub const DEFAULT_EXTENSIONS: [&str; 3] = ["js", "ts", "rs"];

/// Directories never scanned.
const SKIPPED_DIRS: [&str; 3] = ["node_modules", "target", ".git"];

pub struct Auditor {
    root: PathBuf,
    extensions: Vec<String>,
}

impl Auditor {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Replace the extensions of the files scanned for secrets.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run every check and collect their findings.
    pub fn run(&self) -> IssueReport {
        info!("=== Security Audit Report ===\n");
        let mut report = IssueReport::default();
        for (i, (title, check)) in checks::CHECKS.iter().enumerate() {
            info!("{}/{} {title}...", i + 1, checks::CHECKS.len());
            if let Err(err) = check(self, &mut report) {
                warn!("  ⚠️  Check skipped: {err:#}");
            }
        }
        report
    }

    /// Files under the root carrying one of the scanned extensions, in a
    /// stable order.
    pub(crate) fn script_files(&self) -> impl Iterator<Item = PathBuf> + '_ {
        WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                !(e.depth() > 0
                    && e.file_type().is_dir()
                    && e.file_name()
                        .to_str()
                        .is_some_and(|name| SKIPPED_DIRS.contains(&name)))
            })
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| {
                p.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
            })
    }

    /// `path` relative to the root, for findings.
    pub(crate) fn display(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_script_files_skip_vendored_trees() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for sub in ["scripts", "node_modules/pkg", "target/debug", ".git/hooks"] {
            fs::create_dir_all(root.join(sub)).unwrap();
        }
        fs::write(root.join("scripts/deploy.js"), "").unwrap();
        fs::write(root.join("scripts/notes.md"), "").unwrap();
        fs::write(root.join("build.rs"), "").unwrap();
        fs::write(root.join("node_modules/pkg/index.js"), "").unwrap();
        fs::write(root.join("target/debug/gen.rs"), "").unwrap();
        fs::write(root.join(".git/hooks/pre-commit.js"), "").unwrap();

        let auditor = Auditor::new(root);
        let files = auditor
            .script_files()
            .map(|p| auditor.display(&p))
            .collect::<Vec<_>>();
        assert_eq!(files, vec!["build.rs", "scripts/deploy.js"]);

        let auditor = Auditor::new(root).with_extensions(["md"]);
        assert_eq!(auditor.script_files().count(), 1);
    }
}
