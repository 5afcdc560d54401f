use crate::{
    report::{IssueReport, Severity},
    Auditor,
};
use anyhow::{Context, Result};
use log::{info, warn};
use std::{path::Path, process::Command};

/// Run the advisory audit of every package manager whose lockfile or
/// manifest is present. A failing audit is a high finding; an auditor that
/// cannot be started fails the check.
pub(crate) fn audit_dependencies(auditor: &Auditor, report: &mut IssueReport) -> Result<()> {
    let root = auditor.root();
    let mut audited = false;

    if root.join("package.json").is_file() {
        info!("  Running npm audit...");
        run_audit(
            root,
            "npm audit",
            Command::new("npm").args(["audit", "--audit-level=moderate"]),
            report,
        )?;
        audited = true;
    }
    if root.join("Cargo.lock").is_file() {
        info!("  Running cargo audit...");
        // the subcommand binary, so that a missing install fails to spawn
        run_audit(
            root,
            "cargo audit",
            Command::new("cargo-audit").arg("audit"),
            report,
        )?;
        audited = true;
    }

    if !audited {
        info!("  ✓ No dependency manifest to audit");
    }
    Ok(())
}

fn run_audit(
    root: &Path,
    label: &str,
    command: &mut Command,
    report: &mut IssueReport,
) -> Result<()> {
    let status = command
        .current_dir(root)
        .status()
        .with_context(|| format!("running {label}"))?;

    if status.success() {
        info!("  ✓ No critical vulnerabilities found");
    } else {
        report.add(Severity::High, format!("{label} found vulnerabilities"));
        warn!("  ⚠️  Vulnerabilities detected - review the {label} output");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_manifest_runs_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut report = IssueReport::default();

        audit_dependencies(&Auditor::new(dir.path()), &mut report).unwrap();
        assert_eq!(report, IssueReport::default());
    }

    #[test]
    fn test_missing_auditor_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut report = IssueReport::default();

        assert!(run_audit(
            dir.path(),
            "missing audit",
            &mut Command::new("no-such-auditor-binary"),
            &mut report
        )
        .is_err());
        assert_eq!(report.count(Severity::High), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_status_decides_the_finding() {
        let dir = tempfile::tempdir().unwrap();
        let mut report = IssueReport::default();

        run_audit(dir.path(), "clean audit", &mut Command::new("true"), &mut report).unwrap();
        assert_eq!(report.count(Severity::High), 0);

        run_audit(dir.path(), "npm audit", &mut Command::new("false"), &mut report).unwrap();
        assert_eq!(report.findings(Severity::High), ["npm audit found vulnerabilities"]);
    }
}
