use std::time::Duration;

use coordination::debate::{ConfigError, DebateConfig, DEFAULT_MODEL};

/// Default Anthropic API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 120;
const DEFAULT_AGENT_MAX_TOKENS: u32 = 300;
const DEFAULT_JUDGE_MAX_TOKENS: u32 = 2048;

/// Anthropic Messages API endpoint configuration.
#[derive(Debug, Clone)]
pub struct AnthropicEndpoint {
    pub base_url: String,
    pub api_key: String,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
}

/// Top-level runner configuration.
#[derive(Debug, Clone)]
pub struct BilogicConfig {
    pub endpoint: AnthropicEndpoint,
    /// Model for both debaters.
    pub agent_model: String,
    /// Model for the judge.
    pub judge_model: String,
    pub agent_max_tokens: u32,
    pub judge_max_tokens: u32,
    /// Bound on a single debate step (None = unlimited).
    pub node_timeout: Option<Duration>,
}

impl BilogicConfig {
    /// Load from the process environment (after `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    ///
    /// `ANTHROPIC_API_KEY` is required; everything else falls back to a default.
    /// Unparseable numbers are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("ANTHROPIC_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingSetting {
                name: "ANTHROPIC_API_KEY",
            })?;

        let base_url = lookup("ANTHROPIC_BASE_URL")
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());

        let model = lookup("BILOGIC_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into());
        let judge_model = lookup("BILOGIC_JUDGE_MODEL").unwrap_or_else(|| model.clone());

        let http_timeout = parse_positive::<u64>(&lookup, "BILOGIC_HTTP_TIMEOUT_SECS")
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

        Ok(Self {
            endpoint: AnthropicEndpoint {
                base_url: base_url.trim_end_matches('/').to_string(),
                api_key,
                timeout: Duration::from_secs(http_timeout),
            },
            agent_model: model,
            judge_model,
            agent_max_tokens: parse_positive(&lookup, "BILOGIC_AGENT_MAX_TOKENS")
                .unwrap_or(DEFAULT_AGENT_MAX_TOKENS),
            judge_max_tokens: parse_positive(&lookup, "BILOGIC_JUDGE_MAX_TOKENS")
                .unwrap_or(DEFAULT_JUDGE_MAX_TOKENS),
            node_timeout: parse_positive::<u64>(&lookup, "BILOGIC_NODE_TIMEOUT_SECS")
                .map(Duration::from_secs),
        })
    }

    /// Orchestrator settings derived from this config.
    pub fn debate_config(&self) -> DebateConfig {
        DebateConfig {
            agent_model: self.agent_model.clone(),
            judge_model: self.judge_model.clone(),
            agent_max_tokens: self.agent_max_tokens,
            judge_max_tokens: self.judge_max_tokens,
            node_timeout: self.node_timeout,
        }
    }
}

fn parse_positive<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .filter(|v| *v > T::default())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let err = BilogicConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingSetting {
                name: "ANTHROPIC_API_KEY"
            }
        );

        let err = BilogicConfig::from_lookup(lookup_from(&[("ANTHROPIC_API_KEY", "  ")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingSetting { .. }));
    }

    #[test]
    fn test_defaults() {
        let config = BilogicConfig::from_lookup(lookup_from(&[("ANTHROPIC_API_KEY", "sk-test")]))
            .unwrap();
        assert_eq!(config.endpoint.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.endpoint.timeout, Duration::from_secs(120));
        assert_eq!(config.agent_model, DEFAULT_MODEL);
        assert_eq!(config.judge_model, DEFAULT_MODEL);
        assert_eq!(config.agent_max_tokens, 300);
        assert_eq!(config.judge_max_tokens, 2048);
        assert!(config.node_timeout.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = BilogicConfig::from_lookup(lookup_from(&[
            ("ANTHROPIC_API_KEY", "sk-test"),
            ("ANTHROPIC_BASE_URL", "http://localhost:8317/"),
            ("BILOGIC_MODEL", "claude-sonnet-4-5"),
            ("BILOGIC_AGENT_MAX_TOKENS", "200"),
            ("BILOGIC_NODE_TIMEOUT_SECS", "45"),
        ]))
        .unwrap();
        assert_eq!(config.endpoint.base_url, "http://localhost:8317");
        assert_eq!(config.agent_model, "claude-sonnet-4-5");
        assert_eq!(config.judge_model, "claude-sonnet-4-5");
        assert_eq!(config.agent_max_tokens, 200);
        assert_eq!(config.node_timeout, Some(Duration::from_secs(45)));

        let debate = config.debate_config();
        assert_eq!(debate.agent_max_tokens, 200);
        assert_eq!(debate.node_timeout, Some(Duration::from_secs(45)));
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = BilogicConfig::from_lookup(lookup_from(&[
            ("ANTHROPIC_API_KEY", "sk-test"),
            ("BILOGIC_AGENT_MAX_TOKENS", "lots"),
            ("BILOGIC_JUDGE_MAX_TOKENS", "0"),
            ("BILOGIC_NODE_TIMEOUT_SECS", "-5"),
        ]))
        .unwrap();
        assert_eq!(config.agent_max_tokens, 300);
        assert_eq!(config.judge_max_tokens, 2048);
        assert!(config.node_timeout.is_none());
    }
}
