use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_filter(level: &str, verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("economic_client=debug,info")
        } else {
            EnvFilter::new(format!("economic_client={}", level))
        }
    })
}

/// 安裝精簡格式的日誌；已有全域 subscriber 時回傳 false
pub fn init_logger(verbose: bool) -> bool {
    init_compact_logger("info", verbose)
}

pub fn init_compact_logger(level: &str, verbose: bool) -> bool {
    tracing_subscriber::registry()
        .with(default_filter(level, verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init()
        .is_ok()
}

pub fn init_json_logger(level: &str) -> bool {
    tracing_subscriber::registry()
        .with(default_filter(level, false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .try_init()
        .is_ok()
}

pub fn init_from_config(config: &LoggingConfig) -> bool {
    match config.format {
        LogFormat::Json => init_json_logger(&config.level),
        LogFormat::Compact => init_compact_logger(&config.level, config.verbose),
    }
}
