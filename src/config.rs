//! Configuration management for the succession resolver
use crate::reports::generator::SUPPORTED_FORMATS;
use crate::reports::graphviz::IMAGE_FORMATS;
use crate::types::PropagationPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub propagation: PropagationSettings,
    pub graph_output: GraphOutputSettings,
    pub report: ReportSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PropagationSettings {
    pub policy: PropagationPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphOutputSettings {
    pub enabled: bool,
    pub path: PathBuf,
    pub image_format: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub format: String,
}

impl Default for GraphOutputSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: PathBuf::from("succession.dot"),
            image_format: None,
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Defaults, then the config file if it exists, then environment overrides
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) if path.exists() => {
                info!("Loading configuration from: {:?}", path);
                Config::load_from_file(path)?
            }
            Some(path) => {
                warn!("Configuration file not found: {:?}. Using defaults.", path);
                Config::default()
            }
            None => Config::default(),
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Override settings from environment variables if present
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(policy) = std::env::var("SUCCESSION_POLICY") {
            self.propagation.policy = serde_yaml::from_str(&policy)
                .with_context(|| format!("Invalid SUCCESSION_POLICY: {}", policy))?;
        }

        if let Ok(path) = std::env::var("SUCCESSION_GRAPH_OUTPUT") {
            self.graph_output.path = PathBuf::from(path);
            self.graph_output.enabled = true;
        }

        if let Ok(format) = std::env::var("SUCCESSION_IMAGE_FORMAT") {
            self.graph_output.image_format = Some(format);
        }

        if let Ok(format) = std::env::var("SUCCESSION_REPORT_FORMAT") {
            self.report.format = format;
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.graph_output.enabled && self.graph_output.path.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("Graph output path is required when graph output is enabled"));
        }

        if let Some(format) = &self.graph_output.image_format {
            if !IMAGE_FORMATS.contains(&format.as_str()) {
                return Err(anyhow::anyhow!(
                    "Unsupported image format '{}', expected one of {:?}",
                    format,
                    IMAGE_FORMATS
                ));
            }
        }

        if !SUPPORTED_FORMATS.contains(&self.report.format.to_lowercase().as_str()) {
            return Err(anyhow::anyhow!(
                "Unsupported report format '{}', expected one of {:?}",
                self.report.format,
                SUPPORTED_FORMATS
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_save_and_load() {
        let mut config = Config::default();
        config.propagation.policy = PropagationPolicy::Topological;
        config.graph_output.image_format = Some("png".to_string());
        let temp_file = NamedTempFile::new().unwrap();

        config.save_to_file(temp_file.path()).unwrap();
        let loaded_config = Config::load_from_file(temp_file.path()).unwrap();

        assert_eq!(loaded_config.propagation.policy, PropagationPolicy::Topological);
        assert_eq!(loaded_config.graph_output.image_format.as_deref(), Some("png"));
        assert_eq!(loaded_config.report.format, "text");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = serde_yaml::from_str("propagation:\n  policy: topological\n").unwrap();

        assert_eq!(config.propagation.policy, PropagationPolicy::Topological);
        assert!(!config.graph_output.enabled);
        assert_eq!(config.graph_output.path, PathBuf::from("succession.dot"));
        assert_eq!(config.report.format, "text");
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.graph_output.enabled = true;
        config.graph_output.path = PathBuf::new();
        assert!(config.validate().is_err());

        config = Config::default();
        config.graph_output.image_format = Some("bmp".to_string());
        assert!(config.validate().is_err());

        config = Config::default();
        config.report.format = "xml".to_string();
        assert!(config.validate().is_err());

        config.report.format = "JSON".to_string();
        assert!(config.validate().is_ok());
    }

    // The only test touching SUCCESSION_* variables, so parallel tests never race on them
    #[test]
    fn test_env_overrides_file() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(
            temp_file.path(),
            "propagation:\n  policy: breadth_first\nreport:\n  format: json\n",
        )
        .unwrap();

        std::env::set_var("SUCCESSION_POLICY", "topological");
        std::env::set_var("SUCCESSION_GRAPH_OUTPUT", "out/pedigree.dot");
        std::env::set_var("SUCCESSION_IMAGE_FORMAT", "svg");
        std::env::set_var("SUCCESSION_REPORT_FORMAT", "text");

        let config = Config::load(Some(temp_file.path()));

        std::env::set_var("SUCCESSION_POLICY", "depth_first");
        let invalid = Config::load(None);

        for var in [
            "SUCCESSION_POLICY",
            "SUCCESSION_GRAPH_OUTPUT",
            "SUCCESSION_IMAGE_FORMAT",
            "SUCCESSION_REPORT_FORMAT",
        ] {
            std::env::remove_var(var);
        }

        let config = config.unwrap();
        assert_eq!(config.propagation.policy, PropagationPolicy::Topological);
        assert!(config.graph_output.enabled);
        assert_eq!(config.graph_output.path, PathBuf::from("out/pedigree.dot"));
        assert_eq!(config.graph_output.image_format.as_deref(), Some("svg"));
        assert_eq!(config.report.format, "text");

        let msg = format!("{:#}", invalid.unwrap_err());
        assert!(msg.contains("Invalid SUCCESSION_POLICY: depth_first"), "Error was: {}", msg);

        // Without overrides a missing file falls back to the defaults
        let config = Config::load(Some(Path::new("/nonexistent/succession.yml"))).unwrap();
        assert_eq!(config.propagation.policy, PropagationPolicy::BreadthFirst);
        assert!(!config.graph_output.enabled);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = Config::load_from_file("/nonexistent/succession.yml");
        let msg = format!("{:#}", result.unwrap_err());
        assert!(msg.contains("Failed to read config file"), "Error was: {}", msg);
    }
}
