use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            enable_file_logs: false,
            log_dir: "./logs".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to create log file appender in {dir}: {message}")]
    Appender { dir: String, message: String },
    #[error("failed to install tracing subscriber: {0}")]
    Init(String),
}

fn tolerate_already_set(error: impl std::fmt::Display) -> Result<(), LoggingError> {
    // 全局 subscriber 已存在（测试里重复初始化）不算错误
    let message = error.to_string();
    if message.contains("already been set") {
        Ok(())
    } else {
        Err(LoggingError::Init(message))
    }
}

/// 初始化全局 tracing；可重复调用
pub fn init_tracing(config: &LogConfig) -> Result<(), LoggingError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let stdout_layer = fmt::layer().with_target(true).with_thread_ids(false);
    let registry = Registry::default().with(env_filter).with(stdout_layer);

    if config.enable_file_logs {
        let file_appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("vocab-quiz-backend")
            .filename_suffix("log")
            .max_log_files(30)
            .build(&config.log_dir)
            .map_err(|e| LoggingError::Appender {
                dir: config.log_dir.clone(),
                message: e.to_string(),
            })?;
        let file_layer = fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false)
            .json();
        registry
            .with(file_layer)
            .try_init()
            .or_else(tolerate_already_set)
    } else {
        registry.try_init().or_else(tolerate_already_set)
    }
}
