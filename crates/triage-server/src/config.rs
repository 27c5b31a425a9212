//! Server configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use triage_classifier::ClassificationConfig;

use crate::cli::Cli;

/// Top-level server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Classification engine and providers
    #[serde(default)]
    pub classification: ClassificationConfig,

    /// Cross-origin access for the web frontend
    #[serde(default)]
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, cli: &Cli) -> anyhow::Result<Self> {
        // Try to load from file, or use defaults
        let mut config = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            Self::default()
        };

        // Apply CLI overrides
        if let Some(listen) = &cli.listen {
            config.listen = listen.clone();
        }

        if let Some(port) = cli.port {
            config.port = port;
        }

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.listen, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            classification: ClassificationConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins; `"*"` allows any
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl CorsConfig {
    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

fn default_listen() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:3000".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use triage_classifier::ProviderKind;

    #[test]
    fn test_missing_file_uses_defaults() {
        let cli = Cli::default();
        let config = ServerConfig::load("/nonexistent/triage.yaml", &cli).unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:8000");
        assert_eq!(config.classification.providers.len(), 2);
        assert!(!config.cors.allows_any());
    }

    #[test]
    fn test_file_then_cli_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
listen: 0.0.0.0
port: 9000
classification:
  max_output_tokens: 64
  providers:
    - kind: openai
cors:
  allowed_origins: ["*"]
"#
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli {
            config: path.clone(),
            port: Some(9100),
            ..Default::default()
        };
        let config = ServerConfig::load(&path, &cli).unwrap();

        assert_eq!(config.listen, "0.0.0.0");
        assert_eq!(config.port, 9100);
        assert_eq!(config.classification.max_output_tokens, 64);
        assert_eq!(config.classification.timeout_ms, 10_000);
        assert_eq!(config.classification.providers[0].kind, ProviderKind::OpenAi);
        assert_eq!(config.classification.providers.len(), 1);
        assert!(config.cors.allows_any());
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port: [not a number").unwrap();
        let path = file.path().to_str().unwrap().to_string();
        assert!(ServerConfig::load(&path, &Cli::default()).is_err());
    }
}
