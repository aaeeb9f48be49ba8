use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::rules::context::MatchFormat;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub formats: FormatsConfig,
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
    #[serde(default)]
    pub usage: UsageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormatsConfig {
    #[serde(default = "default_t20_profile")]
    pub t20: FormatProfile,
    #[serde(default = "default_odi_profile")]
    pub odi: FormatProfile,
}

/// Per-format overs table used by the rule families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatProfile {
    pub nominal_overs: u32,
    /// Gates 50/100-run-in-match and Highest Individual Score.
    pub minimum_overs: u32,
    /// Overs lost at or beyond this voids the match totals markets.
    pub reduction_void_threshold: u32,
    /// Only read when `top_market_basis = "format_minimum"`.
    pub top_market_minimum_overs: u32,
    pub segment_overs: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopMarketBasis {
    #[default]
    PercentOfOriginal,
    FormatMinimum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ThresholdsConfig {
    #[serde(default = "default_completion_pct")]
    pub completion_pct: u32,
    #[serde(default = "default_top_market_pct")]
    pub top_market_pct: u32,
    #[serde(default)]
    pub top_market_basis: TopMarketBasis,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UsageConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_counter_path")]
    pub counter_path: String,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config from {:?}", path.as_ref()))?;
        let config: Config = toml::from_str(&content)
            .context("Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise fall back to built-in defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn profile(&self, format: MatchFormat) -> &FormatProfile {
        match format {
            MatchFormat::T20 => &self.formats.t20,
            MatchFormat::Odi => &self.formats.odi,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, p) in [("t20", &self.formats.t20), ("odi", &self.formats.odi)] {
            if p.nominal_overs == 0 {
                anyhow::bail!("formats.{}.nominal_overs must be positive", name);
            }
            if p.reduction_void_threshold == 0 {
                anyhow::bail!("formats.{}.reduction_void_threshold must be positive", name);
            }
            if p.minimum_overs > p.nominal_overs
                || p.top_market_minimum_overs > p.nominal_overs
                || p.segment_overs > p.nominal_overs
            {
                anyhow::bail!(
                    "formats.{}: overs thresholds cannot exceed nominal overs ({})",
                    name,
                    p.nominal_overs
                );
            }
        }

        for (name, pct) in [
            ("completion_pct", self.thresholds.completion_pct),
            ("top_market_pct", self.thresholds.top_market_pct),
        ] {
            if !(1..=100).contains(&pct) {
                anyhow::bail!("thresholds.{} must be within 1..=100, got {}", name, pct);
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            formats: FormatsConfig::default(),
            thresholds: ThresholdsConfig::default(),
            usage: UsageConfig::default(),
        }
    }
}

impl Default for FormatsConfig {
    fn default() -> Self {
        Self {
            t20: default_t20_profile(),
            odi: default_odi_profile(),
        }
    }
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            completion_pct: default_completion_pct(),
            top_market_pct: default_top_market_pct(),
            top_market_basis: TopMarketBasis::default(),
        }
    }
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            counter_path: default_counter_path(),
        }
    }
}

fn default_t20_profile() -> FormatProfile {
    FormatProfile {
        nominal_overs: 20,
        minimum_overs: 20,
        reduction_void_threshold: 3,
        top_market_minimum_overs: 10,
        segment_overs: 6,
    }
}

fn default_odi_profile() -> FormatProfile {
    FormatProfile {
        nominal_overs: 50,
        minimum_overs: 40,
        reduction_void_threshold: 5,
        top_market_minimum_overs: 25,
        segment_overs: 15,
    }
}

fn default_completion_pct() -> u32 {
    80
}

fn default_top_market_pct() -> u32 {
    50
}

fn default_true() -> bool {
    true
}

fn default_counter_path() -> String {
    "data/usage.json".to_string()
}
