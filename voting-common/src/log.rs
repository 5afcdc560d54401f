use env_logger::Env;
use log::Level;
use std::io::Write;

/// Initializes the logger with an `info` default filter, overridable
/// through `RUST_LOG`. Informational lines are printed bare, other levels
/// carry their level as a prefix.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| match record.level() {
            Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(buf, "[{level}] {}", record.args()),
        })
        .try_init();
}
