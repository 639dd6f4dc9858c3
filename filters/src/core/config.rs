use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::filters::{
    CodecLimits, DEFAULT_MAX_DEPTH, DEFAULT_MAX_FILTER_BYTES, ReferenceOption,
};
use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{APP_DOT_FOLDER, CONFIG_FILE_NAME, VIEWS_DIR_NAME};

// =============================================================================
// File Config (raw, all optional)
// =============================================================================

/// Saved views configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ViewsFileConfig {
    pub dir: Option<String>,
}

/// Decoding limits configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LimitsFileConfig {
    pub max_filter_bytes: Option<usize>,
    pub max_depth: Option<usize>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub views: Option<ViewsFileConfig>,
    pub limits: Option<LimitsFileConfig>,
    pub reference_lists: Option<BTreeMap<String, Vec<ReferenceOption>>>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(views) = other.views {
            let current = self.views.get_or_insert_with(ViewsFileConfig::default);
            if views.dir.is_some() {
                tracing::trace!(dir = ?views.dir, "Merging views.dir");
                current.dir = views.dir;
            }
        }

        if let Some(limits) = other.limits {
            let current = self.limits.get_or_insert_with(LimitsFileConfig::default);
            if limits.max_filter_bytes.is_some() {
                tracing::trace!(max_filter_bytes = ?limits.max_filter_bytes, "Merging limits.max_filter_bytes");
                current.max_filter_bytes = limits.max_filter_bytes;
            }
            if limits.max_depth.is_some() {
                tracing::trace!(max_depth = ?limits.max_depth, "Merging limits.max_depth");
                current.max_depth = limits.max_depth;
            }
        }

        // Reference lists merge per list name; a later file replaces a whole list
        if let Some(lists) = other.reference_lists {
            let current = self.reference_lists.get_or_insert_with(BTreeMap::new);
            for (name, options) in lists {
                tracing::trace!(list = %name, count = options.len(), "Merging reference list");
                current.insert(name, options);
            }
        }
    }
}

// =============================================================================
// App Config (resolved)
// =============================================================================

#[derive(Debug, Clone)]
pub struct ViewsConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct LimitsConfig {
    pub max_filter_bytes: usize,
    pub max_depth: usize,
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub views: ViewsConfig,
    pub limits: LimitsConfig,
    pub reference_lists: BTreeMap<String, Vec<ReferenceOption>>,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.fleetdesk/fleetdesk.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        // 1. Load from profile dir - skip if not exists
        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        // 2. Load from CLI-specified path OR local directory
        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        Self::resolve(cli, file_config)
    }

    /// Layer configs: defaults -> file config -> CLI/env overrides
    fn resolve(cli: &CliConfig, file_config: FileConfig) -> Result<Self> {
        let file_views = file_config.views.unwrap_or_default();
        let file_limits = file_config.limits.unwrap_or_default();

        let views_dir = match (&cli.views_dir, file_views.dir) {
            (Some(dir), _) => expand_path(&dir.to_string_lossy()),
            (None, Some(dir)) => expand_path(&dir),
            (None, None) => default_views_dir()?,
        };

        let config = Self {
            views: ViewsConfig { dir: views_dir },
            limits: LimitsConfig {
                max_filter_bytes: file_limits
                    .max_filter_bytes
                    .unwrap_or(DEFAULT_MAX_FILTER_BYTES),
                max_depth: file_limits.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
            },
            reference_lists: file_config.reference_lists.unwrap_or_default(),
        };

        config.validate()?;
        tracing::debug!(
            views_dir = %config.views.dir.display(),
            max_filter_bytes = config.limits.max_filter_bytes,
            max_depth = config.limits.max_depth,
            reference_lists = config.reference_lists.len(),
            "Configuration resolved"
        );
        Ok(config)
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.limits.max_filter_bytes == 0 {
            anyhow::bail!("Configuration error: limits.max_filter_bytes must be greater than 0");
        }
        if self.limits.max_depth == 0 {
            anyhow::bail!("Configuration error: limits.max_depth must be greater than 0");
        }
        for (name, options) in &self.reference_lists {
            if let Some(option) = options.iter().find(|o| o.code.is_empty()) {
                anyhow::bail!(
                    "Configuration error: reference list '{}' has an entry with an empty code (label '{}')",
                    name,
                    option.label
                );
            }
        }
        Ok(())
    }

    /// Decoding guards for persisted filters
    pub fn codec_limits(&self) -> CodecLimits {
        CodecLimits {
            max_bytes: self.limits.max_filter_bytes,
            max_depth: self.limits.max_depth,
        }
    }
}

/// Get the profile config path (~/.fleetdesk/fleetdesk.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Default saved views directory (~/.fleetdesk/views)
fn default_views_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|h| h.join(APP_DOT_FOLDER).join(VIEWS_DIR_NAME))
        .context("Could not determine home directory; set --views-dir or views.dir")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_config_parse_full() {
        let json = r#"{
            "views": { "dir": "/srv/fleetdesk/views" },
            "limits": { "max_filter_bytes": 1024, "max_depth": 4 },
            "reference_lists": {
                "countries": [{ "code": "AE", "label": "United Arab Emirates" }]
            }
        }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();

        assert_eq!(
            config.views.as_ref().unwrap().dir,
            Some("/srv/fleetdesk/views".to_string())
        );
        let limits = config.limits.as_ref().unwrap();
        assert_eq!(limits.max_filter_bytes, Some(1024));
        assert_eq!(limits.max_depth, Some(4));
        let lists = config.reference_lists.as_ref().unwrap();
        assert_eq!(lists["countries"][0].code, "AE");
    }

    #[test]
    fn test_file_config_parse_empty() {
        let config: FileConfig = serde_json::from_str("{}").unwrap();
        assert!(config.views.is_none());
        assert!(config.limits.is_none());
        assert!(config.reference_lists.is_none());
    }

    #[test]
    fn test_file_config_parse_extra_fields() {
        let json = r#"{ "views": { "dir": "/tmp" }, "vews": 123 }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.extra.get("vews").unwrap(), 123);
        config.warn_unknown_fields();
    }

    #[test]
    fn test_file_config_merge() {
        let mut base: FileConfig = serde_json::from_str(
            r#"{
                "views": { "dir": "/base" },
                "limits": { "max_filter_bytes": 100, "max_depth": 5 },
                "reference_lists": {
                    "countries": [{ "code": "AE", "label": "UAE" }],
                    "sources": [{ "code": "web", "label": "Website" }]
                }
            }"#,
        )
        .unwrap();
        let overlay: FileConfig = serde_json::from_str(
            r#"{
                "limits": { "max_depth": 8 },
                "reference_lists": {
                    "countries": [{ "code": "SA", "label": "Saudi Arabia" }]
                }
            }"#,
        )
        .unwrap();

        base.merge(overlay);

        assert_eq!(base.views.as_ref().unwrap().dir, Some("/base".to_string()));
        let limits = base.limits.as_ref().unwrap();
        assert_eq!(limits.max_filter_bytes, Some(100));
        assert_eq!(limits.max_depth, Some(8));
        let lists = base.reference_lists.as_ref().unwrap();
        assert_eq!(lists["countries"].len(), 1);
        assert_eq!(lists["countries"][0].code, "SA");
        assert_eq!(lists["sources"][0].code, "web");
    }

    #[test]
    fn test_resolve_defaults() {
        let config = AppConfig::resolve(
            &CliConfig {
                views_dir: Some(PathBuf::from("/tmp/views")),
                ..Default::default()
            },
            FileConfig::default(),
        )
        .unwrap();
        assert_eq!(config.views.dir, PathBuf::from("/tmp/views"));
        assert_eq!(config.codec_limits(), CodecLimits::default());
        assert!(config.reference_lists.is_empty());
    }

    #[test]
    fn test_resolve_cli_overrides_file() {
        let file: FileConfig =
            serde_json::from_str(r#"{ "views": { "dir": "/from/file" } }"#).unwrap();
        let config = AppConfig::resolve(
            &CliConfig {
                views_dir: Some(PathBuf::from("/from/cli")),
                ..Default::default()
            },
            file,
        )
        .unwrap();
        assert_eq!(config.views.dir, PathBuf::from("/from/cli"));

        let file: FileConfig =
            serde_json::from_str(r#"{ "views": { "dir": "/from/file" } }"#).unwrap();
        let config = AppConfig::resolve(&CliConfig::default(), file).unwrap();
        assert_eq!(config.views.dir, PathBuf::from("/from/file"));
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let file: FileConfig =
            serde_json::from_str(r#"{ "views": { "dir": "/tmp" }, "limits": { "max_depth": 0 } }"#)
                .unwrap();
        let err = AppConfig::resolve(&CliConfig::default(), file).unwrap_err();
        assert!(err.to_string().contains("limits.max_depth"));
    }

    #[test]
    fn test_validate_rejects_empty_reference_code() {
        let file: FileConfig = serde_json::from_str(
            r#"{ "views": { "dir": "/tmp" }, "reference_lists": { "countries": [{ "code": "", "label": "Nowhere" }] } }"#,
        )
        .unwrap();
        let err = AppConfig::resolve(&CliConfig::default(), file).unwrap_err();
        assert!(err.to_string().contains("countries"));
    }

    #[test]
    fn test_load_from_file_errors_carry_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();
        let err = FileConfig::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));

        let missing = dir.path().join("missing.json");
        let err = FileConfig::load_from_file(&missing).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_missing_cli_config_fails() {
        let err = AppConfig::load(&CliConfig {
            config: Some(PathBuf::from("/definitely/not/here/fleetdesk.json")),
            views_dir: Some(PathBuf::from("/tmp")),
        })
        .unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }
}
