use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_bets_limit")]
    pub bets_limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Slugs force-included at the top of the list regardless of search
    /// ranking.
    #[serde(default = "default_pinned_slugs")]
    pub pinned_slugs: Vec<String>,
    #[serde(default = "default_search_term")]
    pub search_term: String,
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
    /// Total markets shown: pinned plus search fill, deduplicated by id.
    #[serde(default = "default_max_markets")]
    pub max_markets: usize,
}

fn default_base_url() -> String {
    "https://api.manifold.markets/v0".to_string()
}
fn default_bets_limit() -> usize {
    2000
}
fn default_pinned_slugs() -> Vec<String> {
    vec![
        "will-we-get-agi-before-2030".to_string(),
        "will-we-develop-leopolds-dropin-rem".to_string(),
    ]
}
fn default_search_term() -> String {
    "AGI artificial general intelligence".to_string()
}
fn default_search_limit() -> usize {
    14
}
fn default_max_markets() -> usize {
    12
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            bets_limit: default_bets_limit(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            pinned_slugs: default_pinned_slugs(),
            search_term: default_search_term(),
            search_limit: default_search_limit(),
            max_markets: default_max_markets(),
        }
    }
}

impl Config {
    /// Load from a toml file, falling back to defaults when the file is
    /// absent. `MANIFOLD_API_URL` (environment or .env) overrides the API
    /// base URL either way.
    pub fn load(path: &str) -> Result<Self> {
        dotenv::dotenv().ok();

        let mut config = if Path::new(path).exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path))?
        } else {
            tracing::info!("No config file at {}, using defaults", path);
            Config::default()
        };

        if let Ok(url) = std::env::var("MANIFOLD_API_URL") {
            config.api.base_url = url;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "https://api.manifold.markets/v0");
        assert_eq!(config.api.bets_limit, 2000);
        assert_eq!(config.dashboard.max_markets, 12);
        assert_eq!(config.dashboard.pinned_slugs.len(), 2);
    }

    #[test]
    fn test_env_overrides_base_url() {
        // One test covers both load paths so the process-global variable
        // is set and removed in a single place.
        std::env::set_var("MANIFOLD_API_URL", "https://staging.example.com/v0");

        let config = Config::load("/nonexistent/manifold-dash.toml").unwrap();
        assert_eq!(config.api.base_url, "https://staging.example.com/v0");

        let path = std::env::temp_dir().join("manifold-dash-env-override-test.toml");
        std::fs::write(&path, "[api]\nbase_url = \"https://file.example.com\"\n").unwrap();
        let config = Config::load(path.to_str().unwrap()).unwrap();
        // The environment wins over the file value.
        assert_eq!(config.api.base_url, "https://staging.example.com/v0");

        std::fs::remove_file(&path).ok();
        std::env::remove_var("MANIFOLD_API_URL");
    }

    #[test]
    fn test_parse_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [dashboard]
            search_term = "fusion"
            max_markets = 6
            "#,
        )
        .unwrap();

        assert_eq!(config.dashboard.search_term, "fusion");
        assert_eq!(config.dashboard.max_markets, 6);
        assert_eq!(config.dashboard.search_limit, 14);
        assert_eq!(config.api.bets_limit, 2000);
    }
}
