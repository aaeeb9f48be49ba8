//! Goes-on carve-out applied after raw rule evaluation
//!
//! Markets in the goes-on set may already be decided by play before the
//! reduction was known, so a raw VOID is never shown for them: it becomes
//! `DependsGoesOn`, or `Stands` when the caller confirms the outcome.

use crate::rules::context::DeterminedFlags;
use crate::rules::verdict::Verdict;

/// Labeled variant suffix that also counts as a goes-on market
pub const DEPENDS_SUFFIX: &str = " — Depends";

/// Which determined flag unlocks a goes-on market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GoesOnKey {
    LinePassed,
    WicketFallen,
    OpeningPartnership,
}

impl GoesOnKey {
    pub fn is_determined(&self, flags: &DeterminedFlags) -> bool {
        match self {
            GoesOnKey::LinePassed => flags.line_already_passed,
            GoesOnKey::WicketFallen => flags.wicket_already_fallen,
            GoesOnKey::OpeningPartnership => flags.opening_partnership_already_determined,
        }
    }
}

const GOES_ON_MARKETS: &[(&str, GoesOnKey)] = &[
    ("Highest Opening Partnership", GoesOnKey::OpeningPartnership),
    ("Fall of 1st Wicket", GoesOnKey::WicketFallen),
    ("Batter Total Runs", GoesOnKey::LinePassed),
    ("Batter to Score 50+ Runs", GoesOnKey::LinePassed),
    ("Batter to Score 100+ Runs", GoesOnKey::LinePassed),
    ("Batter Total Fours", GoesOnKey::LinePassed),
    ("Batter Total Sixes", GoesOnKey::LinePassed),
];

/// Look up a market name, accepting the " — Depends" variant of each entry.
pub fn goes_on_key(market_name: &str) -> Option<GoesOnKey> {
    let base = market_name.strip_suffix(DEPENDS_SUFFIX).unwrap_or(market_name);
    GOES_ON_MARKETS
        .iter()
        .find(|(name, _)| *name == base)
        .map(|(_, key)| *key)
}

pub fn is_goes_on_market(market_name: &str) -> bool {
    goes_on_key(market_name).is_some()
}

/// Every member of the set, base names followed by their labeled variants
pub fn goes_on_market_names() -> Vec<String> {
    let base = GOES_ON_MARKETS.iter().map(|(name, _)| name.to_string());
    let labeled = GOES_ON_MARKETS
        .iter()
        .map(|(name, _)| format!("{}{}", name, DEPENDS_SUFFIX));
    base.chain(labeled).collect()
}

/// Mask a raw verdict for `market_name`. Non-members and non-void verdicts
/// pass through unchanged.
pub fn apply_goes_on(market_name: &str, raw: Verdict, flags: &DeterminedFlags) -> Verdict {
    match goes_on_key(market_name) {
        Some(key) if raw.is_void() => {
            if key.is_determined(flags) {
                Verdict::Stands
            } else {
                Verdict::DependsGoesOn
            }
        }
        _ => raw,
    }
}
