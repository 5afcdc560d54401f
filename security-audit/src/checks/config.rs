use crate::{
    report::{IssueReport, Severity},
    Auditor,
};
use anyhow::{Context, Result};
use log::{info, warn};
use std::fs;

/// A `.env` file at the root is a high finding.
pub(crate) fn env_file(auditor: &Auditor, report: &mut IssueReport) -> Result<()> {
    if auditor.root().join(".env").exists() {
        report.add(Severity::High, ".env file exists - ensure it's in .gitignore");
        warn!("  ⚠️  .env file found");
    } else {
        info!("  ✓ No .env file in repository");
    }
    Ok(())
}

type Rule = fn(&str) -> bool;

fn ignores_local_files(content: &str) -> bool {
    content.contains(".env") && content.contains("node_modules")
}

fn reads_environment(content: &str) -> bool {
    content.contains("process.env")
}

fn holds_no_key(content: &str) -> bool {
    !content.contains("0x") && !content.contains("sk-")
}

/// Files whose content must satisfy a rule when present.
const CONFIG_RULES: [(&str, Rule); 3] = [
    (".gitignore", ignores_local_files),
    ("hardhat.config.js", reads_environment),
    (".env.example", holds_no_key),
];

/// Medium finding for every present configuration file breaking its rule.
pub(crate) fn configuration(auditor: &Auditor, report: &mut IssueReport) -> Result<()> {
    for (name, rule) in CONFIG_RULES {
        let path = auditor.root().join(name);
        if !path.is_file() {
            continue;
        }
        let content =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        if rule(&content) {
            info!("  ✓ {name}: Security configuration OK");
        } else {
            report.add(
                Severity::Medium,
                format!("{name}: Security configuration needs review"),
            );
            warn!("  ⚠️  {name}: Review security settings");
        }
    }
    Ok(())
}
