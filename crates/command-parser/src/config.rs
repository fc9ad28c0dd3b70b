use crate::lexicon::LexiconEntry;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for the command parser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Descriptors below this confidence are reported as low-confidence
    #[serde(default = "default_threshold")]
    pub confidence_threshold: f32,
    /// Zoom step used when a zoom clause carries no numeral
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f64,
    /// Extra lexicon entries merged over the built-in table
    #[serde(default)]
    pub lexicon: Vec<LexiconEntry>,
}

fn default_threshold() -> f32 {
    0.7
}

fn default_zoom_step() -> f64 {
    1.0
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_threshold(),
            zoom_step: default_zoom_step(),
            lexicon: Vec::new(),
        }
    }
}

/// Load a parser config from YAML (`.yml`/`.yaml`) or JSON (anything else)
pub fn load_config_file(path: impl AsRef<Path>) -> anyhow::Result<ParserConfig> {
    let path = path.as_ref();
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading config: {}", path.display()))?;
    let is_yaml = path
        .extension()
        .map(|ext| ext == "yml" || ext == "yaml")
        .unwrap_or(false);
    let config: ParserConfig = if is_yaml {
        serde_yaml::from_str(&raw).with_context(|| format!("parsing yaml: {}", path.display()))?
    } else {
        serde_json::from_str(&raw).with_context(|| format!("parsing json: {}", path.display()))?
    };
    anyhow::ensure!(
        (0.0..=1.0).contains(&config.confidence_threshold),
        "confidence_threshold must be within 0..=1 in {}",
        path.display()
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_yaml() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "confidence_threshold: 0.6\nlexicon:\n  - source: gaari\n    canonical: robot\n"
        )
        .unwrap();
        let config = load_config_file(file.path()).unwrap();
        assert_eq!(config.confidence_threshold, 0.6);
        assert_eq!(config.zoom_step, 1.0);
        assert_eq!(config.lexicon, vec![LexiconEntry::new("gaari", "robot")]);
    }

    #[test]
    fn test_load_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(file, r#"{{"zoom_step": 2.0}}"#).unwrap();
        let config = load_config_file(file.path()).unwrap();
        assert_eq!(config.zoom_step, 2.0);
        assert_eq!(config.confidence_threshold, 0.7);
    }

    #[test]
    fn test_rejects_bad_threshold() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "confidence_threshold: 3.0").unwrap();
        assert!(load_config_file(file.path()).is_err());
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = load_config_file("/nonexistent/parser.yaml").unwrap_err();
        assert!(err.to_string().contains("reading config"));
    }
}
