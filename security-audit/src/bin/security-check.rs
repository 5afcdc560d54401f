use clap::Parser;
use security_audit::Auditor;
use std::{path::PathBuf, process::ExitCode};
use voting_common::log::init_logging;

#[derive(Parser)]
#[command(about = "Heuristic security audit of a contract project")]
struct Args {
    #[arg(default_value = ".")]
    /// Root of the project to audit
    root: PathBuf,

    #[arg(long, value_delimiter = ',')]
    /// Comma-separated extensions of the files scanned for secrets
    extensions: Option<Vec<String>>,
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();

    let mut auditor = Auditor::new(args.root);
    if let Some(extensions) = args.extensions {
        auditor = auditor.with_extensions(extensions);
    }
    let report = auditor.run();
    println!("{report}");

    ExitCode::from(report.exit_code())
}
