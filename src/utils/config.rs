use crate::error::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Harness configuration.
///
/// Every field has a default, so a config file only needs the keys it changes.
/// CLI flags are applied on top after loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Backend root, without the API prefix
    pub base_url: String,

    /// Prefix prepended to every endpoint path
    pub api_prefix: String,

    /// Per-request transport timeout (seconds)
    pub request_timeout_secs: u64,

    /// Document uploaded by every guarded action
    pub document_path: PathBuf,

    /// Where the JSON run summary is written
    pub report_path: PathBuf,

    /// Password used for freshly registered accounts
    pub account_password: String,

    pub plans: PlanNames,
    pub limits: QuotaLimits,
    pub premium: PremiumFixture,
}

/// Plan identifiers as reported in the `user.plan` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanNames {
    pub free: String,
    pub premium: String,
}

/// Quota expectations for the free tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotaLimits {
    /// Expected (case-folded) phrase in the second analysis' `detail`
    pub analysis_limit_phrase: String,

    /// Expected (case-folded) phrase anywhere in a rejected upload's body
    pub upload_limit_phrase: String,

    /// Number of project uploads a free account may perform
    pub free_upload_limit: u32,

    /// Upper bound on upload attempts; must exceed the free limit
    pub upload_max_attempts: u32,

    /// Consecutive analyses a premium account must complete
    pub premium_analysis_count: u32,
}

/// Known elevated-tier account used by the premium scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PremiumFixture {
    pub email: String,
    pub password: String,

    /// Register the fixture (then a fresh account) when login fails
    pub register_fallback: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            api_prefix: "/api".to_string(),
            request_timeout_secs: 30,
            document_path: PathBuf::from("/tmp/test_document.txt"),
            report_path: PathBuf::from("document_analysis_test_results.json"),
            account_password: "TestPassword123!".to_string(),
            plans: PlanNames::default(),
            limits: QuotaLimits::default(),
            premium: PremiumFixture::default(),
        }
    }
}

impl Default for PlanNames {
    fn default() -> Self {
        Self {
            free: "free".to_string(),
            premium: "premium".to_string(),
        }
    }
}

impl Default for QuotaLimits {
    fn default() -> Self {
        Self {
            analysis_limit_phrase: "límite de 1 análisis ia por día alcanzado".to_string(),
            upload_limit_phrase: "límite".to_string(),
            free_upload_limit: 10,
            upload_max_attempts: 12,
            premium_analysis_count: 5,
        }
    }
}

impl Default for PremiumFixture {
    fn default() -> Self {
        Self {
            email: "premium@example.com".to_string(),
            password: "PremiumTest123!".to_string(),
            register_fallback: true,
        }
    }
}

impl HarnessConfig {
    /// Load a YAML config file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| HarnessError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| HarnessError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        // An empty document deserializes to unit, not a map
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    pub fn to_yaml(&self) -> std::result::Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Full URL for an endpoint path such as `/auth/login`.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}{}{}",
            self.base_url.trim_end_matches('/'),
            self.api_prefix.trim_end_matches('/'),
            path
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Reject configurations that would make the scenarios meaningless.
    pub fn validate(&self) -> Result<()> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(HarnessError::InvalidConfig("base_url is empty".to_string()));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(HarnessError::InvalidConfig(format!(
                "base_url must start with http:// or https://, got '{}'",
                base
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(HarnessError::InvalidConfig(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.limits.free_upload_limit == 0 {
            return Err(HarnessError::InvalidConfig(
                "limits.free_upload_limit must be at least 1".to_string(),
            ));
        }
        if self.limits.upload_max_attempts <= self.limits.free_upload_limit {
            return Err(HarnessError::InvalidConfig(format!(
                "limits.upload_max_attempts ({}) must exceed limits.free_upload_limit ({})",
                self.limits.upload_max_attempts, self.limits.free_upload_limit
            )));
        }
        if self.limits.premium_analysis_count == 0 {
            return Err(HarnessError::InvalidConfig(
                "limits.premium_analysis_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = HarnessConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.limits.free_upload_limit, 10);
        assert_eq!(config.limits.upload_max_attempts, 12);
        assert_eq!(config.limits.premium_analysis_count, 5);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
base_url: "https://staging.example.com"
limits:
  free_upload_limit: 3
  upload_max_attempts: 5
premium:
  password: "hunter2"
"#;
        let config = HarnessConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.base_url, "https://staging.example.com");
        assert_eq!(config.api_prefix, "/api");
        assert_eq!(config.limits.free_upload_limit, 3);
        assert_eq!(config.limits.premium_analysis_count, 5);
        assert_eq!(config.premium.password, "hunter2");
        assert_eq!(config.premium.email, "premium@example.com");
        assert!(config.premium.register_fallback);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(HarnessConfig::from_yaml("  \n").unwrap(), HarnessConfig::default());
    }

    #[test]
    fn test_yaml_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harness.yaml");
        let mut config = HarnessConfig::default();
        config.base_url = "http://10.0.0.2:9000".to_string();
        std::fs::write(&path, config.to_yaml().unwrap()).unwrap();

        let loaded = HarnessConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = HarnessConfig::load(Path::new("/nonexistent/harness.yaml")).unwrap_err();
        assert!(matches!(err, HarnessError::ConfigRead { .. }));
    }

    #[test]
    fn test_endpoint_url_joins_segments() {
        let mut config = HarnessConfig::default();
        config.base_url = "https://api.example.com/".to_string();
        assert_eq!(
            config.endpoint_url("/auth/register"),
            "https://api.example.com/api/auth/register"
        );

        config.api_prefix = String::new();
        assert_eq!(
            config.endpoint_url("/auth/login"),
            "https://api.example.com/auth/login"
        );
    }

    #[test]
    fn test_validate_rejects_bad_limits() {
        let mut config = HarnessConfig::default();
        config.limits.upload_max_attempts = 10;
        assert!(matches!(
            config.validate(),
            Err(HarnessError::InvalidConfig(_))
        ));

        let mut config = HarnessConfig::default();
        config.limits.free_upload_limit = 0;
        assert!(config.validate().is_err());

        let mut config = HarnessConfig::default();
        config.limits.premium_analysis_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut config = HarnessConfig::default();
        config.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.base_url = "   ".to_string();
        assert!(config.validate().is_err());

        let mut config = HarnessConfig::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
