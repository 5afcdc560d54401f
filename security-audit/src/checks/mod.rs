//! The audit checks, in execution order.

use crate::{report::IssueReport, Auditor};
use anyhow::Result;

mod config;
mod dependencies;
mod secrets;
mod solidity;

pub(crate) type Check = fn(&Auditor, &mut IssueReport) -> Result<()>;

pub(crate) const CHECKS: [(&str, Check); 8] = [
    ("Checking for hardcoded secrets", secrets::hardcoded_secrets),
    ("Checking .env file security", config::env_file),
    ("Checking Solidity compiler version", solidity::compiler_version),
    ("Checking for reentrancy protection", solidity::reentrancy),
    ("Checking access control patterns", solidity::access_control),
    ("Checking for gas optimization opportunities", solidity::gas),
    ("Checking dependencies for vulnerabilities", dependencies::audit_dependencies),
    ("Checking configuration security", config::configuration),
];
