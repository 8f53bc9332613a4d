//! Runtime configuration
//!
//! Every setting has a default and can be overridden from the environment.
//! The CLI applies its own flags on top.

use std::path::PathBuf;
use tracing::warn;

use crate::core::kelly::KellyFraction;

/// Default directory for the JSON file store
pub const DEFAULT_DATA_DIR: &str = "data/store";

/// Default football data API base URL
pub const DEFAULT_API_URL: &str = "https://v3.football.api-sports.io";

/// League ids ranked first in value bet listings
/// (Premier League, La Liga, Serie A, Bundesliga, Ligue 1, Champions League)
pub const DEFAULT_PRIORITY_LEAGUES: &[u64] = &[39, 140, 135, 78, 61, 2];

/// Football data API settings
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Delay between requests in milliseconds
    pub delay_ms: u64,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Max attempts per request
    pub max_retries: u32,
    /// Preferred bookmaker id for odds (first available otherwise)
    pub bookmaker_id: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            delay_ms: 250,
            timeout_secs: 15,
            max_retries: 3,
            bookmaker_id: None,
        }
    }
}

/// Top-level analytics configuration
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    pub data_dir: PathBuf,
    pub priority_leagues: Vec<u64>,
    pub kelly_fraction: KellyFraction,
    /// Number of leagues shown in league breakdowns
    pub top_leagues: usize,
    pub api: ApiConfig,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            priority_leagues: DEFAULT_PRIORITY_LEAGUES.to_vec(),
            kelly_fraction: KellyFraction::Quarter,
            top_leagues: 5,
            api: ApiConfig::default(),
        }
    }
}

impl AnalyticsConfig {
    /// Build configuration from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// Unparseable values are logged and replaced by defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("FOOTBALL_AI_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(leagues) = lookup("FOOTBALL_AI_PRIORITY_LEAGUES") {
            config.priority_leagues = parse_league_list(&leagues);
        }

        if let Some(fraction) = lookup("FOOTBALL_AI_KELLY_FRACTION") {
            match fraction.parse() {
                Ok(f) => config.kelly_fraction = f,
                Err(e) => warn!("Ignoring FOOTBALL_AI_KELLY_FRACTION: {}", e),
            }
        }

        if let Some(top) = lookup("FOOTBALL_AI_TOP_LEAGUES") {
            match top.parse() {
                Ok(n) => config.top_leagues = n,
                Err(_) => warn!("Ignoring FOOTBALL_AI_TOP_LEAGUES: {}", top),
            }
        }

        if let Some(url) = lookup("FOOTBALL_API_URL") {
            config.api.base_url = url.trim_end_matches('/').to_string();
        }

        config.api.api_key = lookup("FOOTBALL_API_KEY").filter(|k| !k.trim().is_empty());

        if let Some(delay) = lookup("FOOTBALL_API_DELAY_MS") {
            match delay.parse() {
                Ok(ms) => config.api.delay_ms = ms,
                Err(_) => warn!("Ignoring FOOTBALL_API_DELAY_MS: {}", delay),
            }
        }

        if let Some(bookmaker) = lookup("FOOTBALL_API_BOOKMAKER") {
            match bookmaker.parse() {
                Ok(id) => config.api.bookmaker_id = Some(id),
                Err(_) => warn!("Ignoring FOOTBALL_API_BOOKMAKER: {}", bookmaker),
            }
        }

        config
    }

    pub fn is_priority_league(&self, league_id: u64) -> bool {
        self.priority_leagues.contains(&league_id)
    }
}

/// Parse "39, 140,abc" into [39, 140], skipping bad entries
fn parse_league_list(raw: &str) -> Vec<u64> {
    raw.split(',')
        .filter_map(|part| {
            let part = part.trim();
            if part.is_empty() {
                return None;
            }
            match part.parse() {
                Ok(id) => Some(id),
                Err(_) => {
                    warn!("Skipping invalid league id '{}'", part);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_default() {
        let config = AnalyticsConfig::default();
        assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(config.kelly_fraction, KellyFraction::Quarter);
        assert!(config.is_priority_league(39));
        assert!(!config.is_priority_league(999));
        assert_eq!(config.api.max_retries, 3);
        assert!(config.api.api_key.is_none());
    }

    #[test]
    fn test_config_from_lookup() {
        let config = AnalyticsConfig::from_lookup(lookup_from(&[
            ("FOOTBALL_AI_DATA_DIR", "/tmp/football"),
            ("FOOTBALL_AI_PRIORITY_LEAGUES", "39, 140"),
            ("FOOTBALL_AI_KELLY_FRACTION", "half"),
            ("FOOTBALL_API_URL", "http://localhost:8080/"),
            ("FOOTBALL_API_KEY", "secret"),
            ("FOOTBALL_API_BOOKMAKER", "8"),
        ]));

        assert_eq!(config.data_dir, PathBuf::from("/tmp/football"));
        assert_eq!(config.priority_leagues, vec![39, 140]);
        assert_eq!(config.kelly_fraction, KellyFraction::Half);
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.api_key.as_deref(), Some("secret"));
        assert_eq!(config.api.bookmaker_id, Some(8));
    }

    #[test]
    fn test_config_invalid_values_fall_back() {
        let config = AnalyticsConfig::from_lookup(lookup_from(&[
            ("FOOTBALL_AI_KELLY_FRACTION", "0.3"),
            ("FOOTBALL_AI_TOP_LEAGUES", "many"),
            ("FOOTBALL_API_KEY", "  "),
        ]));

        assert_eq!(config.kelly_fraction, KellyFraction::Quarter);
        assert_eq!(config.top_leagues, 5);
        assert!(config.api.api_key.is_none());
    }

    #[test]
    fn test_parse_league_list() {
        assert_eq!(parse_league_list("39,140, 2"), vec![39, 140, 2]);
        assert_eq!(parse_league_list("39,,abc,61"), vec![39, 61]);
        assert!(parse_league_list("").is_empty());
    }
}
