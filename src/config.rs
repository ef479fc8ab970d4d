use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use url::Url;

pub const DEFAULT_SOURCE_URL: &str = "http://localhost:1337";
pub const DEFAULT_TARGET_URL: &str = "https://your-project.strapi.app";
pub const DEFAULT_DIR: &str = "exports";
pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_BATCH_DELAY_MS: u64 = 500;
/// Combined export artifact; never treated as a content type on import.
pub const BUNDLE_FILE_NAME: &str = "all-content.json";

pub const SOURCE_URL_VAR: &str = "LOCAL_STRAPI_URL";
pub const SOURCE_TOKEN_VAR: &str = "STRAPI_API_TOKEN";
pub const TARGET_URL_VAR: &str = "CLOUD_STRAPI_URL";
pub const TARGET_TOKEN_VAR: &str = "CLOUD_STRAPI_API_TOKEN";
pub const TIMEOUT_VAR: &str = "CMS_HTTP_TIMEOUT_SECS";

/// One side of a migration: a CMS base URL and the API token used against it.
#[derive(Clone, Debug, PartialEq)]
pub struct Endpoint {
    pub url: String,
    pub token: Option<String>,
}

impl Endpoint {
    /// Base URL without a trailing slash, validated.
    pub fn base_url(&self) -> Result<String> {
        let trimmed = self.url.trim_end_matches('/');
        let parsed = Url::parse(trimmed).with_context(|| format!("Invalid URL: {}", self.url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!("Unsupported URL scheme '{}' in {}", parsed.scheme(), self.url);
        }
        Ok(trimmed.to_string())
    }
}

/// Everything the export and import commands read at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct MigrateConfig {
    pub source: Endpoint,
    pub target: Endpoint,
    /// Output directory for export, input directory for import.
    pub dir: PathBuf,
    pub batch_size: usize,
    pub batch_delay: Duration,
    /// Per-request timeout. None means requests may wait indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            source: Endpoint { url: DEFAULT_SOURCE_URL.to_string(), token: None },
            target: Endpoint { url: DEFAULT_TARGET_URL.to_string(), token: None },
            dir: PathBuf::from(DEFAULT_DIR),
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: Duration::from_millis(DEFAULT_BATCH_DELAY_MS),
            timeout: None,
        }
    }
}

impl MigrateConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut cfg = Self::default();
        if let Some(url) = get(SOURCE_URL_VAR) { cfg.source.url = url; }
        cfg.source.token = get(SOURCE_TOKEN_VAR);
        if let Some(url) = get(TARGET_URL_VAR) { cfg.target.url = url; }
        cfg.target.token = get(TARGET_TOKEN_VAR);
        if let Some(secs) = get(TIMEOUT_VAR).and_then(|v| v.parse::<u64>().ok()) {
            cfg.timeout = Some(Duration::from_secs(secs));
        }
        cfg
    }

    pub fn source_token(&self) -> Result<&str> {
        match self.source.token.as_deref() {
            Some(token) => Ok(token),
            None => bail!("{} environment variable is required", SOURCE_TOKEN_VAR),
        }
    }

    pub fn target_token(&self) -> Result<&str> {
        match self.target.token.as_deref() {
            Some(token) => Ok(token),
            None => bail!("{} environment variable is required", TARGET_TOKEN_VAR),
        }
    }

    pub fn validate_batching(&self) -> Result<()> {
        if self.batch_size == 0 { bail!("--batch-size must be at least 1"); }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = MigrateConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg, MigrateConfig::default());
        assert_eq!(cfg.source.url, "http://localhost:1337");
        assert_eq!(cfg.batch_size, 10);
        assert_eq!(cfg.batch_delay, Duration::from_millis(500));
        assert!(cfg.timeout.is_none());
        assert!(cfg.source_token().is_err());
        assert!(cfg.target_token().is_err());
    }

    #[test]
    fn reads_both_endpoints() {
        let cfg = MigrateConfig::from_lookup(lookup(&[
            ("LOCAL_STRAPI_URL", "http://cms.local:1337/"),
            ("STRAPI_API_TOKEN", "src-token"),
            ("CLOUD_STRAPI_URL", "https://cloud.example.com"),
            ("CLOUD_STRAPI_API_TOKEN", "dst-token"),
            ("CMS_HTTP_TIMEOUT_SECS", "30"),
        ]));
        assert_eq!(cfg.source.base_url().unwrap(), "http://cms.local:1337");
        assert_eq!(cfg.source_token().unwrap(), "src-token");
        assert_eq!(cfg.target.base_url().unwrap(), "https://cloud.example.com");
        assert_eq!(cfg.target_token().unwrap(), "dst-token");
        assert_eq!(cfg.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn empty_token_counts_as_missing() {
        let cfg = MigrateConfig::from_lookup(lookup(&[("STRAPI_API_TOKEN", "")]));
        let err = cfg.source_token().unwrap_err();
        assert!(err.to_string().contains("STRAPI_API_TOKEN"));
    }

    #[test]
    fn rejects_non_http_urls() {
        let ep = Endpoint { url: "ftp://example.com".into(), token: None };
        assert!(ep.base_url().is_err());
        let ep = Endpoint { url: "not a url".into(), token: None };
        assert!(ep.base_url().is_err());
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let cfg = MigrateConfig { batch_size: 0, ..MigrateConfig::default() };
        assert!(cfg.validate_batching().is_err());
    }
}
