//! Match context for a single settlement evaluation
//!
//! A `MatchContext` is built fresh from a `MatchRequest` and the configured
//! format profiles, evaluated once, then dropped.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::{Config, FormatProfile, ThresholdsConfig};

/// Contract violations when building a context
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContextError {
    #[error("match format is required")]
    MissingFormat,
    #[error("unrecognized match format: {0:?}")]
    UnknownFormat(String),
    #[error("unrecognized reduction stage: {0:?}")]
    UnknownStage(String),
    #[error("{field} cannot be negative (got {value})")]
    NegativeOvers { field: &'static str, value: f64 },
    #[error("{field} must be a finite number")]
    NonFiniteOvers { field: &'static str },
    #[error("reduced overs {reduced} exceeds nominal overs {nominal}")]
    ReducedAboveNominal { reduced: i64, nominal: u32 },
}

/// Limited-overs match format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchFormat {
    T20,
    #[serde(rename = "ODI")]
    Odi,
}

impl MatchFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchFormat::T20 => "T20",
            MatchFormat::Odi => "ODI",
        }
    }

    pub fn all() -> [MatchFormat; 2] {
        [MatchFormat::T20, MatchFormat::Odi]
    }
}

impl fmt::Display for MatchFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchFormat {
    type Err = ContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "t20" => Ok(MatchFormat::T20),
            "odi" => Ok(MatchFormat::Odi),
            _ => Err(ContextError::UnknownFormat(s.to_string())),
        }
    }
}

/// When the reduction was announced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    BeforeStart,
    DuringFirstInnings,
    DuringSecondInnings,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::BeforeStart => "Before start",
            Stage::DuringFirstInnings => "During 1st innings",
            Stage::DuringSecondInnings => "During 2nd innings",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Stage {
    type Err = ContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match key.as_str() {
            "before" | "before-start" => Ok(Stage::BeforeStart),
            "first-innings" | "during-first-innings" | "1st-innings" => {
                Ok(Stage::DuringFirstInnings)
            }
            "second-innings" | "during-second-innings" | "2nd-innings" => {
                Ok(Stage::DuringSecondInnings)
            }
            _ => Err(ContextError::UnknownStage(s.to_string())),
        }
    }
}

/// Externally supplied knowledge that a goes-on market is already decided
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeterminedFlags {
    #[serde(default)]
    pub line_already_passed: bool,
    #[serde(default)]
    pub wicket_already_fallen: bool,
    #[serde(default)]
    pub opening_partnership_already_determined: bool,
}

/// Raw evaluation inputs as supplied by a caller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchRequest {
    pub format: Option<String>,
    pub reduced_overs: Option<i64>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub overs_done: Option<f64>,
    #[serde(default)]
    pub determined: DeterminedFlags,
}

impl MatchRequest {
    pub fn new(format: &str, reduced_overs: i64) -> Self {
        Self {
            format: Some(format.to_string()),
            reduced_overs: Some(reduced_overs),
            ..Default::default()
        }
    }

    pub fn with_stage(mut self, stage: &str) -> Self {
        self.stage = Some(stage.to_string());
        self
    }

    pub fn with_overs_done(mut self, overs_done: f64) -> Self {
        self.overs_done = Some(overs_done);
        self
    }

    pub fn with_determined(mut self, determined: DeterminedFlags) -> Self {
        self.determined = determined;
        self
    }
}

/// Fully resolved, immutable context handed to every market rule
#[derive(Debug, Clone, PartialEq)]
pub struct MatchContext {
    pub format: MatchFormat,
    pub stage: Stage,
    pub original_overs: u32,
    pub reduced_overs: u32,
    pub overs_done: f64,
    pub profile: FormatProfile,
    pub thresholds: ThresholdsConfig,
    pub determined: DeterminedFlags,
}

impl MatchContext {
    /// Resolve a request against the configured format table.
    ///
    /// Omitted reduced overs, or zero or less, means "no reduction" and resolves
    /// to the format's nominal overs; every other malformed input is rejected.
    pub fn from_request(request: &MatchRequest, config: &Config) -> Result<Self, ContextError> {
        let format: MatchFormat = request
            .format
            .as_deref()
            .ok_or(ContextError::MissingFormat)?
            .parse()?;
        let raw_reduced = request.reduced_overs.unwrap_or(0);

        let stage = match request.stage.as_deref() {
            Some(s) => s.parse()?,
            None => Stage::BeforeStart,
        };

        let overs_done = request.overs_done.unwrap_or(0.0);
        if !overs_done.is_finite() {
            return Err(ContextError::NonFiniteOvers { field: "overs_done" });
        }
        if overs_done < 0.0 {
            return Err(ContextError::NegativeOvers { field: "overs_done", value: overs_done });
        }

        let profile = *config.profile(format);
        let original_overs = profile.nominal_overs;
        if raw_reduced > original_overs as i64 {
            return Err(ContextError::ReducedAboveNominal {
                reduced: raw_reduced,
                nominal: original_overs,
            });
        }
        let reduced_overs = if raw_reduced <= 0 {
            original_overs
        } else {
            raw_reduced as u32
        };

        Ok(Self {
            format,
            stage,
            original_overs,
            reduced_overs,
            overs_done,
            profile,
            thresholds: config.thresholds,
            determined: request.determined,
        })
    }

    /// Shorthand for a before-start reduction with default thresholds.
    pub fn before_start(format: MatchFormat, reduced_overs: i64) -> Result<Self, ContextError> {
        Self::from_request(
            &MatchRequest::new(format.as_str(), reduced_overs),
            &Config::default(),
        )
    }

    pub fn overs_lost(&self) -> u32 {
        self.original_overs.saturating_sub(self.reduced_overs)
    }

    pub fn is_reduced(&self) -> bool {
        self.reduced_overs < self.original_overs
    }

    /// `reduced >= pct% of original`, in integer arithmetic so boundaries are exact.
    pub fn meets_pct(&self, pct: u32) -> bool {
        self.reduced_overs as u64 * 100 >= pct as u64 * self.original_overs as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!("t20".parse::<MatchFormat>().unwrap(), MatchFormat::T20);
        assert_eq!(" ODI ".parse::<MatchFormat>().unwrap(), MatchFormat::Odi);
        assert_eq!(
            "test".parse::<MatchFormat>(),
            Err(ContextError::UnknownFormat("test".to_string()))
        );
    }

    #[test]
    fn test_stage_parse() {
        assert_eq!("before".parse::<Stage>().unwrap(), Stage::BeforeStart);
        assert_eq!("Before start".parse::<Stage>().unwrap(), Stage::BeforeStart);
        assert_eq!("first_innings".parse::<Stage>().unwrap(), Stage::DuringFirstInnings);
        assert_eq!("second-innings".parse::<Stage>().unwrap(), Stage::DuringSecondInnings);
        assert!("lunch".parse::<Stage>().is_err());
    }

    #[test]
    fn test_zero_reduction_means_nominal() {
        let ctx = MatchContext::before_start(MatchFormat::Odi, 0).unwrap();
        assert_eq!(ctx.original_overs, 50);
        assert_eq!(ctx.reduced_overs, 50);
        assert!(!ctx.is_reduced());

        let ctx = MatchContext::before_start(MatchFormat::T20, -4).unwrap();
        assert_eq!(ctx.reduced_overs, 20);
    }

    #[test]
    fn test_missing_format_rejected() {
        let req = MatchRequest { reduced_overs: Some(40), ..Default::default() };
        assert_eq!(
            MatchContext::from_request(&req, &Config::default()),
            Err(ContextError::MissingFormat)
        );
    }

    #[test]
    fn test_omitted_reduction_means_nominal() {
        let config = Config::default();

        let req = MatchRequest { format: Some("T20".to_string()), ..Default::default() };
        let ctx = MatchContext::from_request(&req, &config).unwrap();
        assert_eq!(ctx.reduced_overs, 20);
        assert!(!ctx.is_reduced());

        let req = MatchRequest { format: Some("ODI".to_string()), ..Default::default() };
        let ctx = MatchContext::from_request(&req, &config).unwrap();
        assert_eq!(ctx.reduced_overs, 50);
    }

    #[test]
    fn test_overs_done_validation() {
        let config = Config::default();

        let req = MatchRequest::new("T20", 15).with_stage("first-innings").with_overs_done(-1.0);
        assert!(matches!(
            MatchContext::from_request(&req, &config),
            Err(ContextError::NegativeOvers { field: "overs_done", .. })
        ));

        let req = MatchRequest::new("T20", 15).with_overs_done(f64::NAN);
        assert_eq!(
            MatchContext::from_request(&req, &config),
            Err(ContextError::NonFiniteOvers { field: "overs_done" })
        );
    }

    #[test]
    fn test_reduced_above_nominal_rejected() {
        assert_eq!(
            MatchContext::before_start(MatchFormat::T20, 21),
            Err(ContextError::ReducedAboveNominal { reduced: 21, nominal: 20 })
        );
    }

    #[test]
    fn test_meets_pct_boundaries() {
        let ctx = MatchContext::before_start(MatchFormat::Odi, 40).unwrap();
        assert!(ctx.meets_pct(80));
        let ctx = MatchContext::before_start(MatchFormat::Odi, 39).unwrap();
        assert!(!ctx.meets_pct(80));

        let ctx = MatchContext::before_start(MatchFormat::T20, 10).unwrap();
        assert!(ctx.meets_pct(50));
        assert_eq!(ctx.overs_lost(), 10);
    }

    #[test]
    fn test_request_from_json() {
        let json = r#"{"format":"ODI","reduced_overs":46,"determined":{"wicket_already_fallen":true}}"#;
        let req: MatchRequest = serde_json::from_str(json).unwrap();
        let ctx = MatchContext::from_request(&req, &Config::default()).unwrap();
        assert_eq!(ctx.reduced_overs, 46);
        assert_eq!(ctx.stage, Stage::BeforeStart);
        assert!(ctx.determined.wicket_already_fallen);
        assert!(!ctx.determined.line_already_passed);
    }
}
