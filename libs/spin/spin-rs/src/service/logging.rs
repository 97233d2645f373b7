use std::backtrace::Backtrace;
use std::fs::OpenOptions;
use std::io::Write;
use std::{env, panic};

use chrono::Local;
use tracing::metadata::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, Layer};

use crate::model::core_config::Config;
use crate::model::errors::{core_err_unexpected, SpinResult};

pub static LOG_FILE: &str = "spin.log";
pub static PANIC_PREFIX: &str = "panic---";

/// Installs the global subscriber and panic hook. A no-op unless `config.logs` is set.
pub fn init(config: &Config) -> SpinResult<()> {
    if !config.logs {
        return Ok(());
    }

    let level = env::var("LOG_LEVEL")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(LevelFilter::DEBUG);

    let mut layers = Vec::with_capacity(2);

    let log_file = tracing_appender::rolling::never(&config.writeable_path, LOG_FILE);
    layers.push(
        fmt::Layer::new()
            .with_span_events(FmtSpan::CLOSE)
            .with_ansi(config.colored_logs)
            .with_writer(log_file)
            .with_filter(spin_filter(level).with_target("dbrs", level))
            .boxed(),
    );

    if config.stdout_logs {
        #[cfg(not(target_os = "android"))]
        layers.push(
            fmt::Layer::new()
                .with_span_events(FmtSpan::CLOSE)
                .with_ansi(config.colored_logs)
                .with_filter(spin_filter(level))
                .boxed(),
        );

        #[cfg(target_os = "android")]
        if let Ok(writer) =
            tracing_logcat::LogcatMakeWriter::new(tracing_logcat::LogcatTag::Target)
        {
            layers.push(
                fmt::Layer::new()
                    .with_ansi(false)
                    .with_writer(writer)
                    .with_filter(spin_filter(level))
                    .boxed(),
            );
        }
    }

    tracing::subscriber::set_global_default(tracing_subscriber::Registry::default().with(layers))
        .map_err(core_err_unexpected)?;
    capture_panics(config.writeable_path.clone());

    Ok(())
}

/// Only the engine's own events, at `level` and above.
fn spin_filter(level: LevelFilter) -> Targets {
    Targets::new().with_target("spin_rs", level)
}

/// Panics are logged and written to `panic---<timestamp>.log`, which `debug_info` collects.
fn capture_panics(dir: String) {
    panic::set_hook(Box::new(move |panic_info| {
        let bt = Backtrace::force_capture();
        error!("panic detected: {panic_info} {bt}");

        let timestamp = Local::now().format("%Y-%m-%d---%H-%M-%S");
        let file_name = format!("{dir}/{PANIC_PREFIX}{timestamp}.log");
        let content = format!("INFO: {panic_info}\nBT: {bt}");
        let written = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_name)
            .and_then(|mut file| file.write_all(content.as_bytes()));

        if let Err(err) = written {
            eprintln!("panic detected: {panic_info}, but {file_name} could not be written: {err}");
        }
    }));
}

#[cfg(test)]
mod unit_tests {
    use tracing::metadata::LevelFilter;
    use tracing::Level;

    use super::spin_filter;

    #[test]
    fn filter_keeps_only_engine_targets() {
        let filter = spin_filter(LevelFilter::INFO);

        assert!(filter.would_enable("spin_rs::service::billing", &Level::INFO));
        assert!(!filter.would_enable("spin_rs::service::billing", &Level::DEBUG));
        assert!(!filter.would_enable("tokio::runtime", &Level::ERROR));
    }

    #[test]
    fn file_filter_adds_the_store() {
        let filter = spin_filter(LevelFilter::DEBUG).with_target("dbrs", LevelFilter::DEBUG);

        assert!(filter.would_enable("dbrs", &Level::DEBUG));
        assert!(filter.would_enable("spin_rs", &Level::DEBUG));
        assert!(!filter.would_enable("hyper", &Level::WARN));
    }
}
