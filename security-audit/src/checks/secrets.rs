use crate::{
    report::{IssueReport, Severity},
    Auditor,
};
use anyhow::Result;
use log::{debug, info};
use regex::Regex;
use std::{fs, sync::LazyLock};

// Private key, API key, secret and password assignments, each matched
// within a single line. The bracketed letters keep these very lines from
// matching.
static SECRET_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        r#"(?i)priv[a]te.*key.*=.*["'`]0x[a-fA-F0-9]{64}["'`]"#,
        r#"(?i)api.*key.*=.*["'`][a-zA-Z0-9]{20,}["'`]"#,
        r#"(?i)secre[t].*=.*["'`][a-zA-Z0-9]{20,}["'`]"#,
        r#"(?i)pass[w]ord.*=.*["'`].{8,}["'`]"#,
    ]
    .map(|pattern| Regex::new(pattern).unwrap())
});

/// One critical finding per pattern matching a script file.
pub(crate) fn hardcoded_secrets(auditor: &Auditor, report: &mut IssueReport) -> Result<()> {
    let mut found = 0;
    for file in auditor.script_files() {
        let content = match fs::read_to_string(&file) {
            Ok(content) => content,
            Err(err) => {
                debug!("not scanning {}: {err}", file.display());
                continue;
            }
        };
        for pattern in SECRET_PATTERNS.iter() {
            if pattern.is_match(&content) {
                report.add(
                    Severity::Critical,
                    format!("Potential hardcoded secret in {}", auditor.display(&file)),
                );
                found += 1;
            }
        }
    }

    if found > 0 {
        info!("  ❌ Issues found");
    } else {
        info!("  ✓ No secrets detected");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(files: &[(&str, String)]) -> IssueReport {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        let mut report = IssueReport::default();
        hardcoded_secrets(&Auditor::new(dir.path()), &mut report).unwrap();
        report
    }

    #[test]
    fn test_private_key_literal() {
        let report = scan(&[(
            "scripts/deploy.js",
            format!("const privateKey = \"0x{}\";\n", "ab".repeat(32)),
        )]);

        assert_eq!(
            report.findings(Severity::Critical),
            ["Potential hardcoded secret in scripts/deploy.js"]
        );
    }

    #[test]
    fn test_one_finding_per_matching_pattern() {
        let content = format!(
            "const apiKey = '{}';\nconst {} = `{}`;\n",
            "A1".repeat(10),
            ["pass", "word"].concat(),
            "x".repeat(8)
        );
        let report = scan(&[("src/config.ts", content)]);

        assert_eq!(report.count(Severity::Critical), 2);
    }

    #[test]
    fn test_patterns_do_not_span_lines() {
        let content = format!("const privateKey =\n  \"0x{}\";\n", "cd".repeat(32));
        let report = scan(&[("deploy.js", content)]);

        assert_eq!(report.count(Severity::Critical), 0);
    }

    #[test]
    fn test_short_and_skipped_values_are_ignored() {
        let key = format!("const privateKey = \"0x{}\";\n", "ef".repeat(32));
        let report = scan(&[
            ("scripts/ok.js", "const apiKey = process.env.API_KEY;\n".to_string()),
            ("node_modules/pkg/index.js", key.clone()),
            ("contracts/Voting.sol", key),
        ]);

        assert_eq!(report.count(Severity::Critical), 0);
    }
}
