//! Configuration management
//!
//! Static configuration loaded once at startup.
//! 优先级：ENV > config.toml > 默认值。
//! ENV 前缀 `AG`，分隔符 `__`，示例：`AG__SERVER__PORT=9999`。

use serde::{Deserialize, Serialize};

/// 静态配置（从 TOML 和环境变量加载，启动时使用）
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    pub fn load() -> Self {
        use config::{Config, Environment, File};

        let path = "config.toml";

        let builder = Config::builder()
            // 1. 从 TOML 文件加载（可选）
            .add_source(File::with_name(path).required(false))
            // 2. 从环境变量覆盖，前缀 AG，分隔符 __
            .add_source(
                Environment::with_prefix("AG")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

/// 上游地址服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Address provider endpoint; the single outbound call target.
    #[serde(default = "default_upstream_endpoint")]
    pub endpoint: String,
    /// Global timeout for one upstream round-trip, in seconds.
    #[serde(default = "default_upstream_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            endpoint: default_upstream_endpoint(),
            timeout_secs: default_upstream_timeout_secs(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "text" or "json".
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Log file path; empty or absent logs to stdout.
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            enable_rotation: default_enable_rotation(),
            max_backups: default_max_backups(),
        }
    }
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_upstream_endpoint() -> String {
    "https://ischool.gccis.rit.edu/addresses/".to_string()
}

fn default_upstream_timeout_secs() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_enable_rotation() -> bool {
    true
}

fn default_max_backups() -> u32 {
    7
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StaticConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert!(config.server.cpu_count >= 1);
        assert_eq!(
            config.upstream.endpoint,
            "https://ischool.gccis.rit.edu/addresses/"
        );
        assert_eq!(config.upstream.timeout_secs, 5);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "text");
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: StaticConfig =
            toml_from_str("[upstream]\nendpoint = \"http://localhost:9000/addresses/\"\n");
        assert_eq!(config.upstream.endpoint, "http://localhost:9000/addresses/");
        assert_eq!(config.upstream.timeout_secs, 5);
        assert_eq!(config.server.port, 8080);
    }

    fn toml_from_str(raw: &str) -> StaticConfig {
        config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }
}
