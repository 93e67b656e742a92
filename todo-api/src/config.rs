//! 进程配置：环境变量（可由 `.env` 提供）
//!
use std::{net::SocketAddr, time::Duration};

use anyhow::{Context, Result, anyhow};
use todo_domain::eventing::DeliveryMode;

use crate::telemetry::LogFormat;

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:7071";
const DEFAULT_ISSUER: &str = "todo-api";
const DEFAULT_AUDIENCE: &str = "todo-clients";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_SLOW_REQUEST_MS: u64 = 500;

/// JWT 校验参数
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub jwt: JwtConfig,
    pub request_timeout: Duration,
    pub slow_request_threshold: Duration,
    pub event_delivery: DeliveryMode,
    pub log_format: LogFormat,
}

impl Config {
    /// 读取进程环境；先尝试加载 `.env`
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 以任意键值来源构造配置，未设置的键取默认值
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let listen_addr: SocketAddr = var("TODO_LISTEN_ADDR")
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
            .parse()
            .context("invalid TODO_LISTEN_ADDR")?;

        let secret = var("TODO_JWT_SECRET").ok_or_else(|| anyhow!("TODO_JWT_SECRET is required"))?;

        let request_timeout = millis(var("TODO_REQUEST_TIMEOUT_MS"), DEFAULT_REQUEST_TIMEOUT_MS)
            .context("invalid TODO_REQUEST_TIMEOUT_MS")?;
        let slow_request_threshold = millis(var("TODO_SLOW_REQUEST_MS"), DEFAULT_SLOW_REQUEST_MS)
            .context("invalid TODO_SLOW_REQUEST_MS")?;

        let event_delivery = match var("TODO_EVENT_DELIVERY") {
            Some(raw) => raw.parse::<DeliveryMode>().map_err(|e| anyhow!(e))?,
            None => DeliveryMode::default(),
        };
        let log_format = match var("TODO_LOG_FORMAT") {
            Some(raw) => raw.parse::<LogFormat>().map_err(|e| anyhow!(e))?,
            None => LogFormat::default(),
        };

        Ok(Self {
            listen_addr,
            jwt: JwtConfig {
                secret,
                issuer: var("TODO_JWT_ISSUER").unwrap_or_else(|| DEFAULT_ISSUER.to_string()),
                audience: var("TODO_JWT_AUDIENCE").unwrap_or_else(|| DEFAULT_AUDIENCE.to_string()),
            },
            request_timeout,
            slow_request_threshold,
            event_delivery,
            log_format,
        })
    }
}

fn millis(raw: Option<String>, default: u64) -> Result<Duration> {
    let ms = match raw {
        Some(raw) => raw.trim().parse::<u64>()?,
        None => default,
    };
    Ok(Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let cfg = Config::from_lookup(lookup(&[("TODO_JWT_SECRET", "s3cret")])).unwrap();

        assert_eq!(cfg.listen_addr, "127.0.0.1:7071".parse().unwrap());
        assert_eq!(cfg.jwt.issuer, "todo-api");
        assert_eq!(cfg.jwt.audience, "todo-clients");
        assert_eq!(cfg.request_timeout, Duration::from_secs(30));
        assert_eq!(cfg.slow_request_threshold, Duration::from_millis(500));
        assert_eq!(cfg.event_delivery, DeliveryMode::Inline);
        assert_eq!(cfg.log_format, LogFormat::Text);
    }

    #[test]
    fn missing_secret_fails_start_up() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("TODO_JWT_SECRET"));
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = Config::from_lookup(lookup(&[
            ("TODO_JWT_SECRET", "s3cret"),
            ("TODO_LISTEN_ADDR", "0.0.0.0:9000"),
            ("TODO_REQUEST_TIMEOUT_MS", "250"),
            ("TODO_EVENT_DELIVERY", "Detached"),
            ("TODO_LOG_FORMAT", "json"),
        ]))
        .unwrap();

        assert_eq!(cfg.listen_addr.port(), 9000);
        assert_eq!(cfg.request_timeout, Duration::from_millis(250));
        assert_eq!(cfg.event_delivery, DeliveryMode::Detached);
        assert_eq!(cfg.log_format, LogFormat::Json);
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("TODO_JWT_SECRET", "s3cret"),
            ("TODO_SLOW_REQUEST_MS", "soon"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("TODO_SLOW_REQUEST_MS"));
    }
}
