//! Settlement verdicts and their display classes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Settlement status for one market
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum Verdict {
    Stands,
    StandsIfDeclared,
    VoidCancel,
    DependsGoesOn,
    DependsNeedsInfo(String),
}

impl Verdict {
    pub fn needs_info(reason: &str) -> Self {
        Verdict::DependsNeedsInfo(reason.to_string())
    }

    /// Map a threshold check onto Stands / VoidCancel.
    pub fn stands_if(condition: bool) -> Self {
        if condition {
            Verdict::Stands
        } else {
            Verdict::VoidCancel
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Verdict::VoidCancel)
    }

    pub fn color(&self) -> ColorClass {
        match self {
            Verdict::Stands => ColorClass::Affirmative,
            Verdict::VoidCancel => ColorClass::Negative,
            _ => ColorClass::Advisory,
        }
    }

    pub fn text(&self) -> String {
        match self {
            Verdict::Stands => "STANDS".to_string(),
            Verdict::StandsIfDeclared => "STANDS (if declared)".to_string(),
            Verdict::VoidCancel => "VOID/CANCEL".to_string(),
            Verdict::DependsGoesOn => "Depends — GOES-ON applies".to_string(),
            Verdict::DependsNeedsInfo(reason) => format!("Depends ({})", reason),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// Semantic color class used by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorClass {
    Affirmative,
    Negative,
    Advisory,
}

impl ColorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorClass::Affirmative => "affirmative",
            ColorClass::Negative => "negative",
            ColorClass::Advisory => "advisory",
        }
    }
}

impl fmt::Display for ColorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_mapping() {
        assert_eq!(Verdict::Stands.color(), ColorClass::Affirmative);
        assert_eq!(Verdict::VoidCancel.color(), ColorClass::Negative);
        assert_eq!(Verdict::DependsGoesOn.color(), ColorClass::Advisory);
        assert_eq!(Verdict::StandsIfDeclared.color(), ColorClass::Advisory);
        assert_eq!(Verdict::needs_info("x").color(), ColorClass::Advisory);
    }

    #[test]
    fn test_verdict_text() {
        assert_eq!(Verdict::VoidCancel.to_string(), "VOID/CANCEL");
        assert_eq!(
            Verdict::needs_info("need 1st-wicket info").to_string(),
            "Depends (need 1st-wicket info)"
        );
        assert_eq!(Verdict::DependsGoesOn.text(), "Depends — GOES-ON applies");
    }

    #[test]
    fn test_stands_if() {
        assert_eq!(Verdict::stands_if(true), Verdict::Stands);
        assert!(Verdict::stands_if(false).is_void());
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&Verdict::needs_info("need player status")).unwrap();
        assert_eq!(json, r#"{"kind":"depends_needs_info","reason":"need player status"}"#);

        let json = serde_json::to_string(&Verdict::Stands).unwrap();
        assert_eq!(json, r#"{"kind":"stands"}"#);
    }
}
