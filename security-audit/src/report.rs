//! Findings of an audit run, bucketed by severity.

use colored::Colorize;
use std::{
    collections::BTreeMap,
    fmt::{self, Display, Formatter},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Info,
    ];
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
            Severity::Info => "Info",
        };
        write!(f, "{name}")
    }
}

/// Findings of one audit run. Findings keep their insertion order within
/// a severity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IssueReport {
    issues: BTreeMap<Severity, Vec<String>>,
}

impl IssueReport {
    pub fn add<S: Into<String>>(&mut self, severity: Severity, finding: S) {
        self.issues.entry(severity).or_default().push(finding.into());
    }

    pub fn findings(&self, severity: Severity) -> &[String] {
        self.issues
            .get(&severity)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.findings(severity).len()
    }

    pub fn is_failure(&self) -> bool {
        self.count(Severity::Critical) > 0
    }

    /// Critical, high and medium findings.
    pub fn significant(&self) -> usize {
        [Severity::Critical, Severity::High, Severity::Medium]
            .into_iter()
            .map(|s| self.count(s))
            .sum()
    }

    /// Process exit status: 1 iff a critical finding exists.
    pub fn exit_code(&self) -> u8 {
        u8::from(self.is_failure())
    }
}

impl Display for IssueReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n=== Security Audit Summary ===")?;
        for severity in Severity::ALL {
            let label = match severity {
                Severity::Info => "Info".to_string(),
                s => format!("{s} Issues"),
            };
            writeln!(f, "{label}: {}", self.count(severity))?;
        }

        for (severity, title) in [
            (Severity::Critical, "❌ CRITICAL ISSUES:".red().bold()),
            (Severity::High, "⚠️  HIGH PRIORITY:".yellow().bold()),
            (Severity::Medium, "⚠️  MEDIUM PRIORITY:".yellow()),
        ] {
            let findings = self.findings(severity);
            if !findings.is_empty() {
                writeln!(f, "\n{title}")?;
                for finding in findings {
                    writeln!(f, "  - {finding}")?;
                }
            }
        }

        if self.significant() == 0 {
            writeln!(f, "\n{}", "✅ No significant security issues detected!".green())
        } else if self.is_failure() {
            writeln!(
                f,
                "\n{}",
                "❌ Security audit failed - critical issues must be resolved".red()
            )
        } else {
            writeln!(f, "\n{}", "⚠️  Security audit completed with warnings".yellow())
        }
    }
}
