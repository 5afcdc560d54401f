//! Pattern checks over the Solidity sources under `contracts/`.

use crate::{
    report::{IssueReport, Severity},
    Auditor,
};
use anyhow::{ensure, Context, Result};
use log::{info, warn};
use regex::Regex;
use std::{fs, sync::LazyLock};
use walkdir::WalkDir;

static PRAGMA_0_8: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"pragma solidity \^0\.8\.\d+;").unwrap());
/// `.call`, `.send` or `.transfer` invocations; `msg.sender` is not one.
static EXTERNAL_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(call|send|transfer)\s*[({]").unwrap());

/// Above this many `uint256` occurrences, smaller types are suggested.
const UINT256_THRESHOLD: usize = 10;

struct Source {
    /// Path relative to the audit root.
    display: String,
    name: String,
    content: String,
}

fn contract_sources(auditor: &Auditor) -> Result<Vec<Source>> {
    let dir = auditor.root().join("contracts");
    ensure!(dir.is_dir(), "no contracts directory at {}", dir.display());

    WalkDir::new(&dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "sol"))
        .map(|path| -> Result<Source> {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            Ok(Source {
                display: auditor.display(&path),
                name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default(),
                content,
            })
        })
        .collect()
}

/// Medium finding for every source not pinned to a 0.8 compiler.
pub(crate) fn compiler_version(auditor: &Auditor, report: &mut IssueReport) -> Result<()> {
    for source in contract_sources(auditor)? {
        if PRAGMA_0_8.is_match(&source.content) {
            info!("  ✓ {}: Using secure Solidity version", source.name);
        } else {
            report.add(
                Severity::Medium,
                format!("{}: Consider using Solidity ^0.8.x", source.display),
            );
            warn!("  ⚠️  {}: Outdated or unpinned Solidity version", source.name);
        }
    }
    Ok(())
}

/// Medium finding for every source making external calls without a
/// reentrancy guard.
pub(crate) fn reentrancy(auditor: &Auditor, report: &mut IssueReport) -> Result<()> {
    for source in contract_sources(auditor)? {
        let c = &source.content;
        let external_calls = EXTERNAL_CALL.is_match(c);
        let guarded = c.contains("ReentrancyGuard") || c.contains("nonReentrant");
        if external_calls && !guarded {
            report.add(
                Severity::Medium,
                format!(
                    "{}: External calls without reentrancy protection",
                    source.display
                ),
            );
            warn!("  ⚠️  {}: Consider adding ReentrancyGuard", source.name);
        } else {
            info!("  ✓ {}: Reentrancy checks OK", source.name);
        }
    }
    Ok(())
}

/// Low finding for every source without any access control construct.
pub(crate) fn access_control(auditor: &Auditor, report: &mut IssueReport) -> Result<()> {
    for source in contract_sources(auditor)? {
        let c = &source.content;
        let modifiers = c.contains("modifier only") || c.contains("modifier auth");
        let inherited = c.contains("Ownable") || c.contains("AccessControl");
        if modifiers || inherited {
            info!("  ✓ {}: Access control implemented", source.name);
        } else {
            report.add(
                Severity::Low,
                format!("{}: No access control modifiers detected", source.display),
            );
            info!("  ℹ️  {}: Consider adding access control", source.name);
        }
    }
    Ok(())
}

/// Info finding for every source using `uint256` more than
/// [`UINT256_THRESHOLD`] times.
pub(crate) fn gas(auditor: &Auditor, report: &mut IssueReport) -> Result<()> {
    for source in contract_sources(auditor)? {
        if source.content.matches("uint256").count() > UINT256_THRESHOLD {
            report.add(
                Severity::Info,
                format!(
                    "{}: Consider using smaller uint types for gas optimization",
                    source.display
                ),
            );
        }
        info!("  ✓ {}: Gas optimization checks complete", source.name);
    }
    Ok(())
}
