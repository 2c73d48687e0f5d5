//! Logging setup for the command-line host and embedding applications

use log::LevelFilter;

/// Initialize the logger for terminal use.
/// `default_level` applies when RUST_LOG is unset; RUST_LOG always wins.
/// The line format starts with `\r` so it stays readable while a terminal is in raw mode.
/// Calling this more than once is harmless.
pub fn init_logger(default_level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "\r[{} {:5} {}] {}",
                buf.timestamp(),
                record.level(),
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        })
        .try_init();
}
