use std::path::PathBuf;
use std::str::FromStr;

use roster_core::record::{ListOrder, RecordKind};
use roster_core::storage::ImageStorageKind;

/// Default request body limit: 10 MiB, enough for a form with one image.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// A configuration value that could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Server configuration loaded from environment variables.
///
/// All fields except `database_url` have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Postgres connection string.
    pub database_url: String,
    /// Require TLS without verifying the server certificate (local development only).
    pub database_insecure_tls: bool,
    /// Pool size (default: `20`).
    pub database_max_connections: u32,
    /// Which table and route prefix to serve (default: `characters`).
    pub record_kind: RecordKind,
    /// List ordering by `id` (default: `asc`).
    pub list_order: ListOrder,
    /// How uploaded images are persisted (default: `none`).
    pub image_storage: ImageStorageKind,
    /// Directory for the disk image store (default: `public/uploads`).
    pub upload_dir: PathBuf,
    /// URL prefix the upload directory is served at (default: `/uploads`).
    pub upload_url_prefix: String,
    /// Maximum request body size in bytes (default: 10 MiB).
    pub max_upload_bytes: usize,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            database_url: String::new(),
            database_insecure_tls: false,
            database_max_connections: 20,
            record_kind: RecordKind::default(),
            list_order: ListOrder::default(),
            image_storage: ImageStorageKind::default(),
            upload_dir: PathBuf::from("public/uploads"),
            upload_url_prefix: "/uploads".into(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default          |
    /// |----------------------------|------------------|
    /// | `DATABASE_URL`             | required         |
    /// | `DATABASE_INSECURE_TLS`    | `false`          |
    /// | `DATABASE_MAX_CONNECTIONS` | `20`             |
    /// | `HOST`                     | `0.0.0.0`        |
    /// | `PORT`                     | `3000`           |
    /// | `RECORD_KIND`              | `characters`     |
    /// | `LIST_ORDER`               | `asc`            |
    /// | `IMAGE_STORAGE`            | `none`           |
    /// | `UPLOAD_DIR`               | `public/uploads` |
    /// | `UPLOAD_URL_PREFIX`        | `/uploads`       |
    /// | `MAX_UPLOAD_BYTES`         | `10485760`       |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`             |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let upload_url_prefix = var("UPLOAD_URL_PREFIX")
            .unwrap_or(defaults.upload_url_prefix)
            .trim_end_matches('/')
            .to_string();
        if !upload_url_prefix.starts_with('/') || upload_url_prefix.len() < 2 {
            return Err(ConfigError::Invalid {
                var: "UPLOAD_URL_PREFIX",
                value: upload_url_prefix,
                reason: "must be an absolute path such as /uploads".into(),
            });
        }

        let record_kind = parse_or("RECORD_KIND", var("RECORD_KIND"), defaults.record_kind)?;
        if let Some(route) = [record_kind.base_path(), "/health"]
            .into_iter()
            .find(|route| overlaps(&upload_url_prefix, route))
        {
            return Err(ConfigError::Invalid {
                var: "UPLOAD_URL_PREFIX",
                value: upload_url_prefix,
                reason: format!("collides with the {route} routes"),
            });
        }

        Ok(Self {
            host: var("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", var("PORT"), defaults.port)?,
            database_url,
            database_insecure_tls: parse_flag(
                "DATABASE_INSECURE_TLS",
                var("DATABASE_INSECURE_TLS"),
            )?,
            database_max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                var("DATABASE_MAX_CONNECTIONS"),
                defaults.database_max_connections,
            )?,
            record_kind,
            list_order: parse_or("LIST_ORDER", var("LIST_ORDER"), defaults.list_order)?,
            image_storage: parse_or(
                "IMAGE_STORAGE",
                var("IMAGE_STORAGE"),
                defaults.image_storage,
            )?,
            upload_dir: var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            upload_url_prefix,
            max_upload_bytes: parse_or(
                "MAX_UPLOAD_BYTES",
                var("MAX_UPLOAD_BYTES"),
                defaults.max_upload_bytes,
            )?,
            request_timeout_secs: parse_or(
                "REQUEST_TIMEOUT_SECS",
                var("REQUEST_TIMEOUT_SECS"),
                defaults.request_timeout_secs,
            )?,
        })
    }
}

/// Whether one path is equal to, or nested under, the other.
fn overlaps(a: &str, b: &str) -> bool {
    let nested = |outer: &str, inner: &str| {
        inner
            .strip_prefix(outer)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    };
    nested(a, b) || nested(b, a)
}

fn parse_or<T>(var: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
            value: raw,
        }),
    }
}

fn parse_flag(var: &'static str, value: Option<String>) -> Result<bool, ConfigError> {
    match value.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid {
                var,
                value: v,
                reason: "expected true or false".into(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/roster")]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "0.0.0.0");
        assert!(!config.database_insecure_tls);
        assert_eq!(config.record_kind, RecordKind::Characters);
        assert_eq!(config.list_order, ListOrder::Asc);
        assert_eq!(config.image_storage, ImageStorageKind::None);
        assert_eq!(config.upload_url_prefix, "/uploads");
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[test]
    fn database_url_is_required() {
        assert_matches!(load(&[]), Err(ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            ("DATABASE_URL", "postgres://db/items"),
            ("PORT", "8080"),
            ("DATABASE_INSECURE_TLS", "TRUE"),
            ("RECORD_KIND", "items"),
            ("LIST_ORDER", "desc"),
            ("IMAGE_STORAGE", "disk"),
            ("UPLOAD_URL_PREFIX", "/static/img/"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.database_insecure_tls);
        assert_eq!(config.record_kind, RecordKind::Items);
        assert_eq!(config.list_order, ListOrder::Desc);
        assert_eq!(config.image_storage, ImageStorageKind::Disk);
        assert_eq!(config.upload_url_prefix, "/static/img");
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = load(&[("DATABASE_URL", "postgres://x"), ("PORT", "eighty")]).unwrap_err();
        assert_matches!(err, ConfigError::Invalid { var: "PORT", .. });

        let err = load(&[("DATABASE_URL", "postgres://x"), ("IMAGE_STORAGE", "s3")]).unwrap_err();
        assert_matches!(err, ConfigError::Invalid { var: "IMAGE_STORAGE", .. });

        let err = load(&[("DATABASE_URL", "postgres://x"), ("UPLOAD_URL_PREFIX", "uploads")])
            .unwrap_err();
        assert_matches!(err, ConfigError::Invalid { var: "UPLOAD_URL_PREFIX", .. });
    }

    #[test]
    fn upload_prefix_must_not_shadow_routes() {
        for prefix in ["/characters", "/characters/", "/characters/img", "/health"] {
            let err = load(&[("DATABASE_URL", "postgres://x"), ("UPLOAD_URL_PREFIX", prefix)])
                .unwrap_err();
            assert_matches!(err, ConfigError::Invalid { var: "UPLOAD_URL_PREFIX", .. });
        }

        let err = load(&[
            ("DATABASE_URL", "postgres://x"),
            ("RECORD_KIND", "items"),
            ("UPLOAD_URL_PREFIX", "/items"),
        ])
        .unwrap_err();
        assert_matches!(err, ConfigError::Invalid { var: "UPLOAD_URL_PREFIX", .. });

        let config = load(&[
            ("DATABASE_URL", "postgres://x"),
            ("RECORD_KIND", "items"),
            ("UPLOAD_URL_PREFIX", "/characters"),
        ])
        .unwrap();
        assert_eq!(config.upload_url_prefix, "/characters");
        assert!(!overlaps("/uploads", "/characters-uploads"));
    }
}
