use std::{fs::OpenOptions, path::Path};

use anyhow::Context;
use env_logger::{Builder, Env, Target};

const DEFAULT_FILTER: &str = "info";

/// Routes the `log` facade. The terminal is in raw mode while the dashboard
/// runs, so logs go to `log_file`; without one they reach stderr only when
/// `RUST_LOG` asks for them.
pub fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER));
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {} failed", path.display()))?;
            builder.target(Target::Pipe(Box::new(file)));
        }
        None if std::env::var_os("RUST_LOG").is_some() => {
            builder.target(Target::Stderr);
        }
        None => return Ok(()),
    }
    builder.format_timestamp_millis();
    if let Err(err) = builder.try_init() {
        log::debug!("logger already initialized: {err}");
    }
    Ok(())
}
