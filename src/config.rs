use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use crate::constants::DEFAULT_DISTRACTOR_POOL_SIZE;
use crate::logging::LogConfig;

/// 干扰项池大小的允许范围：至少要能凑出两个干扰项
pub const DISTRACTOR_POOL_MIN: usize = 2;
pub const DISTRACTOR_POOL_MAX: usize = 500;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub sled_path: String,
    pub cors_origin: String,
    pub distractor_pool_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 3000,
            log_level: "info".to_string(),
            enable_file_logs: false,
            log_dir: "./logs".to_string(),
            sled_path: "./data/vocab-quiz.sled".to_string(),
            cors_origin: "http://localhost:5173".to_string(),
            distractor_pool_size: DEFAULT_DISTRACTOR_POOL_SIZE,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_or_parse("HOST", defaults.host),
            port: env_or_parse("PORT", defaults.port),
            log_level: env_or("RUST_LOG", &defaults.log_level),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", defaults.enable_file_logs),
            log_dir: env_or("LOG_DIR", &defaults.log_dir),
            sled_path: env_or("SLED_PATH", &defaults.sled_path),
            cors_origin: env_or("CORS_ORIGIN", &defaults.cors_origin),
            distractor_pool_size: env_or_parse(
                "DISTRACTOR_POOL_SIZE",
                defaults.distractor_pool_size,
            )
            .clamp(DISTRACTOR_POOL_MIN, DISTRACTOR_POOL_MAX),
        }
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            log_level: self.log_level.clone(),
            enable_file_logs: self.enable_file_logs,
            log_dir: self.log_dir.clone(),
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(key, value = %raw, "Failed to parse env var, using default");
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
