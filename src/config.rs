//! Configuration management for the resume screener

use crate::error::{Result, ScreenerError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub remote: RemoteConfig,
    pub analysis: AnalysisConfig,
    pub scoring: ScoringConfig,
}

/// Remote AI service endpoints and timeouts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub base_url: String,
    pub health_endpoint: String,
    pub standard_endpoint: String,
    pub advanced_endpoint: String,
    /// Per-endpoint availability probe timeout
    pub probe_timeout_secs: u64,
    /// Standard analysis submission timeout
    pub standard_timeout_secs: u64,
    /// Comprehensive analysis runs heavier models and gets more headroom
    pub advanced_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Maximum characters of extracted text returned to callers as a preview
    pub preview_length: usize,
    /// Resumes shorter than this are rejected as insufficient
    pub min_text_length: usize,
}

/// Weights of the four match factors, out of a 100 point budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub title_weight: f64,
    pub skills_weight: f64,
    pub description_weight: f64,
    pub requirements_weight: f64,
}

impl Default for Config {
    fn default() -> Self {
        let base_url = std::env::var("AI_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:5001".to_string());

        Self {
            remote: RemoteConfig {
                base_url,
                health_endpoint: "/api/health".to_string(),
                standard_endpoint: "/api/ats/analyze-resume".to_string(),
                advanced_endpoint: "/api/ats2025/analyze-resume".to_string(),
                probe_timeout_secs: 5,
                standard_timeout_secs: 30,
                advanced_timeout_secs: 60,
            },
            analysis: AnalysisConfig {
                preview_length: 1500,
                min_text_length: 10,
            },
            scoring: ScoringConfig::default(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            title_weight: 25.0,
            skills_weight: 40.0,
            description_weight: 15.0,
            requirements_weight: 20.0,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| ScreenerError::Configuration(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ScreenerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&config_path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-screener")
            .join("config.toml")
    }
}
