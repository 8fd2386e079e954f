use crate::core::error::{PipelineError, Result};
use crate::models::ModernBertSize;
use crate::pipelines::utils::DeviceRequest;
use crate::sentiment::{LabelMapping, ModelVariant};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Service configuration, read from a TOML file.
///
/// Every section and field is optional; missing ones take the defaults below.
///
/// ```toml
/// [server]
/// host = "0.0.0.0"
/// port = 7860
///
/// [model]
/// variant = "multilingual"
/// size = "base"
/// device = "cuda:0"
///
/// [fallback]
/// keyword_classifier = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    /// Overrides the label table that ships with the selected variant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<LabelMapping>,
    pub fallback: FallbackConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7860,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub variant: ModelVariant,
    /// Only used by the multilingual variant.
    pub size: ModernBertSize,
    /// `auto`, `cpu`, `cuda` or `cuda:<ordinal>`.
    pub device: String,
    /// Hub repository to load instead of the variant's default checkpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    /// Hub repository holding `tokenizer.json`, when it differs from the default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokenizer_id: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            variant: ModelVariant::Binary,
            size: ModernBertSize::Base,
            device: "auto".to_string(),
            model_id: None,
            tokenizer_id: None,
        }
    }
}

impl ModelConfig {
    pub fn device_request(&self) -> Result<DeviceRequest> {
        self.device.parse().map_err(PipelineError::Config)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Serve with the rule-based keyword classifier when the model fails to load.
    pub keyword_classifier: bool,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            keyword_classifier: true,
        }
    }
}

impl ServiceConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: ServiceConfig = toml::from_str(contents)
            .map_err(|e| PipelineError::Config(format!("Invalid service config: {e}")))?;
        config.model.device_request()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&contents)
    }

    /// The configured label table, or the default one for the variant.
    pub fn label_mapping(&self) -> LabelMapping {
        self.labels
            .clone()
            .unwrap_or_else(|| LabelMapping::for_variant(self.model.variant))
    }
}
