// src/config.rs

use crate::error::ConfigError;
use crate::reader::MetricsReader;
use crate::rules::{PathTransformingRule, RawRule};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Count metrics are not built when this is empty.
    pub request_count_metric_name: String,
    pub target_processing_time_metric_name: String,
    pub path_transforming_rules: Vec<PathTransformingRule>,
    pub target_paths: Vec<String>,
    pub custom_tags: Vec<CustomTag>,
}

/// The configuration file as written, before its regexps are compiled.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default, rename = "request_count_metrics_name")]
    request_count_metric_name: String,
    #[serde(default, rename = "target_processing_time_metrics_name")]
    target_processing_time_metric_name: String,
    #[serde(default)]
    path_transforming_rules: Vec<RawRule>,
    #[serde(default)]
    target_paths: Vec<String>,
    #[serde(default)]
    custom_tags: Vec<CustomTag>,
}

impl TryFrom<RawConfig> for Config {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let path_transforming_rules = raw
            .path_transforming_rules
            .into_iter()
            .map(PathTransformingRule::try_from)
            .collect::<Result<_, _>>()?;

        Ok(Self {
            request_count_metric_name: raw.request_count_metric_name,
            target_processing_time_metric_name: raw.target_processing_time_metric_name,
            path_transforming_rules,
            target_paths: raw.target_paths,
            custom_tags: raw.custom_tags,
        })
    }
}

/// A tag attached to every exported series. Its value is read from the
/// `env_key` environment variable at export time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CustomTag {
    pub name: String,
    pub env_key: String,
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_yaml::from_str(yaml)?;
        raw.try_into()
    }

    pub fn from_reader(mut reader: impl Read) -> Result<Self, ConfigError> {
        let mut yaml = String::new();
        reader.read_to_string(&mut yaml)?;
        Self::from_yaml_str(&yaml)
    }

    pub fn reader(&self) -> MetricsReader {
        MetricsReader::new(
            self.path_transforming_rules.clone(),
            self.target_paths.iter().cloned(),
        )
    }
}
