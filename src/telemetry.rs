//! Subscriber setup shared by the binaries.

use std::{env, fs, path::PathBuf};

use anyhow::{Context, Result};
use time::macros::format_description;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter,
    fmt::{format::FmtSpan, time::UtcTime},
};

/// Filter used when `RUST_LOG` is unset. Polars logs its query plans at
/// `info`, which would drown the generator's own events.
pub const DEFAULT_FILTER: &str = "info,polars=warn,polars_core=warn,polars_io=warn";

/// Installs a JSON `tracing` subscriber filtered by `RUST_LOG` (default
/// [`DEFAULT_FILTER`]).
///
/// Inside a container events go to stdout. Otherwise they go to a fresh,
/// timestamped file under the platform state directory, and the returned
/// guard must be held until the program exits so buffered events are flushed.
pub fn init_tracing(app_name: &str) -> Result<Option<WorkerGuard>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    if in_container() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_span_events(FmtSpan::NONE)
            .with_current_span(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_timer(UtcTime::rfc_3339())
            .init();

        info!("Logging to stdout (container mode)");
        return Ok(None);
    }

    let log_dir = log_dir(app_name)?;
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let timestamp = time::OffsetDateTime::now_utc()
        .format(&format_description!(
            "[year][month][day]-[hour][minute][second]"
        ))
        .context("Failed to format timestamp")?;
    let file_name = format!("{app_name}-{timestamp}.log");
    let file_path = log_dir.join(&file_name);

    let file_appender = tracing_appender::rolling::never(&log_dir, &file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter)
        .with_writer(non_blocking)
        .with_span_events(FmtSpan::NONE)
        .with_current_span(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_timer(UtcTime::rfc_3339())
        .init();

    info!(log_file = %file_path.display(), "Logging to file (local mode)");
    Ok(Some(guard))
}

fn in_container() -> bool {
    env::var("CONTAINER").is_ok() || std::path::Path::new("/.dockerenv").exists()
}

fn log_dir(app_name: &str) -> Result<PathBuf> {
    if let Some(mut dir) = dirs::state_dir() {
        dir.push(app_name);
        dir.push("logs");
        return Ok(dir);
    }
    let mut home = dirs::home_dir().context("Failed to find home directory")?;
    home.push(format!(".local/state/{app_name}/logs"));
    Ok(home)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_quiets_polars() {
        let filter = EnvFilter::try_new(DEFAULT_FILTER).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("polars=warn"), "{rendered}");
    }

    #[test]
    fn log_files_live_under_the_app_directory() {
        let dir = log_dir("bizsim-generate").unwrap();
        assert!(dir.ends_with("bizsim-generate/logs"), "{}", dir.display());
    }
}
