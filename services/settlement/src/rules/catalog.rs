//! Canonical market catalog and per-family decision functions
//!
//! Every market is keyed by a `MarketId`; each id belongs to exactly one
//! `RuleFamily`, and each family is a small pure function over the
//! `MatchContext`. Display order is the order of `RuleTable::canonical()`.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::TopMarketBasis;
use crate::rules::context::{MatchContext, Stage};
use crate::rules::verdict::Verdict;

/// Identifies the rule set shipped in `RuleTable::canonical()`
pub const RULESET_VERSION: &str = "reduced-overs-v3";

pub type DecisionFn = fn(&MatchContext) -> Verdict;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketId {
    FirstOverTotalRuns,
    FirstWicketMethod,
    FirstWicketMethodTwoWay,
    FirstOverRunsOddEven,
    FiftyInMatch,
    HundredInMatch,
    BatterFiftyPlus,
    BatterHundredPlus,
    MostMatchSixes,
    MostMatchFours,
    PlayerOfTheMatch,
    TopBowler,
    TopBatter,
    MostRunOuts,
    FallOfFirstWicket,
    HighestOpeningPartnership,
    TotalMatchSixes,
    TotalMatchFours,
    TotalRunOuts,
    TiedMatch,
    BowlerMatchBet,
    BatterMatchBet,
    BatterTotalRuns,
    BatterTotalFours,
    BatterTotalSixes,
    BowlerTotalWickets,
    TeamHighestFirstSegment,
    HighestIndividualScore,
}

impl MarketId {
    /// Canonical display order
    pub const ALL: [MarketId; 28] = [
        MarketId::FirstOverTotalRuns,
        MarketId::FirstWicketMethod,
        MarketId::FirstWicketMethodTwoWay,
        MarketId::FirstOverRunsOddEven,
        MarketId::FiftyInMatch,
        MarketId::HundredInMatch,
        MarketId::BatterFiftyPlus,
        MarketId::BatterHundredPlus,
        MarketId::MostMatchSixes,
        MarketId::MostMatchFours,
        MarketId::PlayerOfTheMatch,
        MarketId::TopBowler,
        MarketId::TopBatter,
        MarketId::MostRunOuts,
        MarketId::FallOfFirstWicket,
        MarketId::HighestOpeningPartnership,
        MarketId::TotalMatchSixes,
        MarketId::TotalMatchFours,
        MarketId::TotalRunOuts,
        MarketId::TiedMatch,
        MarketId::BowlerMatchBet,
        MarketId::BatterMatchBet,
        MarketId::BatterTotalRuns,
        MarketId::BatterTotalFours,
        MarketId::BatterTotalSixes,
        MarketId::BowlerTotalWickets,
        MarketId::TeamHighestFirstSegment,
        MarketId::HighestIndividualScore,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            MarketId::FirstOverTotalRuns => "1st Over Total Runs",
            MarketId::FirstWicketMethod => "1st Wicket Method",
            MarketId::FirstWicketMethodTwoWay => "1st Wicket Method (2 Way)",
            MarketId::FirstOverRunsOddEven => "1st Over Runs Odd/Even",
            MarketId::FiftyInMatch => "A Fifty Score in Match",
            MarketId::HundredInMatch => "A Hundred Score in Match",
            MarketId::BatterFiftyPlus => "Batter to Score 50+ Runs",
            MarketId::BatterHundredPlus => "Batter to Score 100+ Runs",
            MarketId::MostMatchSixes => "Most Match Sixes",
            MarketId::MostMatchFours => "Most Match Fours",
            MarketId::PlayerOfTheMatch => "Player of the Match",
            MarketId::TopBowler => "Top Bowler",
            MarketId::TopBatter => "Top Batter",
            MarketId::MostRunOuts => "Most Run Outs",
            MarketId::FallOfFirstWicket => "Fall of 1st Wicket — Depends",
            MarketId::HighestOpeningPartnership => "Highest Opening Partnership",
            MarketId::TotalMatchSixes => "Total Match Sixes",
            MarketId::TotalMatchFours => "Total Match Fours",
            MarketId::TotalRunOuts => "Total Run Outs",
            MarketId::TiedMatch => "Tied Match",
            MarketId::BowlerMatchBet => "Bowler Match Bet",
            MarketId::BatterMatchBet => "Batter Match Bet",
            MarketId::BatterTotalRuns => "Batter Total Runs",
            MarketId::BatterTotalFours => "Batter Total Fours",
            MarketId::BatterTotalSixes => "Batter Total Sixes",
            MarketId::BowlerTotalWickets => "Bowler Total Wickets",
            MarketId::TeamHighestFirstSegment => "Team Highest 1st 6/15 Overs",
            MarketId::HighestIndividualScore => "Highest Individual Score",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketId::FirstOverTotalRuns => "first_over_total_runs",
            MarketId::FirstWicketMethod => "first_wicket_method",
            MarketId::FirstWicketMethodTwoWay => "first_wicket_method_two_way",
            MarketId::FirstOverRunsOddEven => "first_over_runs_odd_even",
            MarketId::FiftyInMatch => "fifty_in_match",
            MarketId::HundredInMatch => "hundred_in_match",
            MarketId::BatterFiftyPlus => "batter_fifty_plus",
            MarketId::BatterHundredPlus => "batter_hundred_plus",
            MarketId::MostMatchSixes => "most_match_sixes",
            MarketId::MostMatchFours => "most_match_fours",
            MarketId::PlayerOfTheMatch => "player_of_the_match",
            MarketId::TopBowler => "top_bowler",
            MarketId::TopBatter => "top_batter",
            MarketId::MostRunOuts => "most_run_outs",
            MarketId::FallOfFirstWicket => "fall_of_first_wicket",
            MarketId::HighestOpeningPartnership => "highest_opening_partnership",
            MarketId::TotalMatchSixes => "total_match_sixes",
            MarketId::TotalMatchFours => "total_match_fours",
            MarketId::TotalRunOuts => "total_run_outs",
            MarketId::TiedMatch => "tied_match",
            MarketId::BowlerMatchBet => "bowler_match_bet",
            MarketId::BatterMatchBet => "batter_match_bet",
            MarketId::BatterTotalRuns => "batter_total_runs",
            MarketId::BatterTotalFours => "batter_total_fours",
            MarketId::BatterTotalSixes => "batter_total_sixes",
            MarketId::BowlerTotalWickets => "bowler_total_wickets",
            MarketId::TeamHighestFirstSegment => "team_highest_first_segment",
            MarketId::HighestIndividualScore => "highest_individual_score",
        }
    }

    pub fn family(&self) -> RuleFamily {
        match self {
            MarketId::FirstOverTotalRuns | MarketId::FirstOverRunsOddEven => RuleFamily::OverZeroProp,
            MarketId::FirstWicketMethod | MarketId::FirstWicketMethodTwoWay => {
                RuleFamily::FirstWicketMethod
            }
            MarketId::FiftyInMatch | MarketId::HundredInMatch | MarketId::HighestIndividualScore => {
                RuleFamily::MatchMilestone
            }
            MarketId::BatterFiftyPlus
            | MarketId::BatterHundredPlus
            | MarketId::BatterTotalRuns
            | MarketId::BatterTotalFours
            | MarketId::BatterTotalSixes
            | MarketId::FallOfFirstWicket
            | MarketId::HighestOpeningPartnership => RuleFamily::CompletionGoesOn,
            MarketId::MostMatchSixes | MarketId::MostMatchFours => RuleFamily::NoReduction,
            MarketId::PlayerOfTheMatch => RuleFamily::IfDeclared,
            MarketId::TopBowler | MarketId::TopBatter => RuleFamily::TopMarket,
            MarketId::MostRunOuts | MarketId::TiedMatch => RuleFamily::MatchHappened,
            MarketId::TotalMatchSixes | MarketId::TotalMatchFours | MarketId::TotalRunOuts => {
                RuleFamily::OversLost
            }
            MarketId::BowlerMatchBet | MarketId::BatterMatchBet => RuleFamily::PlayerStatus,
            MarketId::BowlerTotalWickets => RuleFamily::Completion,
            MarketId::TeamHighestFirstSegment => RuleFamily::FirstSegment,
        }
    }

    pub fn decide(&self, ctx: &MatchContext) -> Verdict {
        (self.family().decision())(ctx)
    }
}

/// Groups of markets sharing one decision function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleFamily {
    OverZeroProp,
    FirstWicketMethod,
    MatchMilestone,
    CompletionGoesOn,
    NoReduction,
    IfDeclared,
    TopMarket,
    MatchHappened,
    OversLost,
    PlayerStatus,
    Completion,
    FirstSegment,
}

impl RuleFamily {
    pub fn decision(&self) -> DecisionFn {
        match self {
            RuleFamily::OverZeroProp => over_zero_prop,
            RuleFamily::FirstWicketMethod => first_wicket_method,
            RuleFamily::MatchMilestone => match_milestone,
            RuleFamily::CompletionGoesOn | RuleFamily::Completion => completion_proxy,
            RuleFamily::NoReduction => no_reduction,
            RuleFamily::IfDeclared => if_declared,
            RuleFamily::TopMarket => top_market,
            RuleFamily::MatchHappened => match_happened,
            RuleFamily::OversLost => overs_lost,
            RuleFamily::PlayerStatus => player_status,
            RuleFamily::FirstSegment => first_segment,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            RuleFamily::OverZeroProp => "stands if the 1st over is bowled",
            RuleFamily::FirstWicketMethod => "stands before start, else needs 1st-wicket info",
            RuleFamily::MatchMilestone => "reduced >= format minimum overs",
            RuleFamily::CompletionGoesOn => "reduced >= completion % of original (goes-on)",
            RuleFamily::NoReduction => "no reduction tolerated",
            RuleFamily::IfDeclared => "stands if declared",
            RuleFamily::TopMarket => "reduced >= top-market % of original",
            RuleFamily::MatchHappened => "stands unless abandoned",
            RuleFamily::OversLost => "overs lost < format void threshold",
            RuleFamily::PlayerStatus => "needs player status info",
            RuleFamily::Completion => "reduced >= completion % of original",
            RuleFamily::FirstSegment => "reduced >= segment overs (6 T20 / 15 ODI)",
        }
    }
}

fn over_zero_prop(ctx: &MatchContext) -> Verdict {
    let first_over_bowled = match ctx.stage {
        Stage::BeforeStart => ctx.reduced_overs >= 1,
        _ => ctx.overs_done >= 1.0,
    };
    Verdict::stands_if(first_over_bowled)
}

fn first_wicket_method(ctx: &MatchContext) -> Verdict {
    if ctx.stage == Stage::BeforeStart && ctx.reduced_overs >= 1 {
        Verdict::Stands
    } else {
        Verdict::needs_info("need 1st-wicket info")
    }
}

fn match_milestone(ctx: &MatchContext) -> Verdict {
    Verdict::stands_if(ctx.reduced_overs >= ctx.profile.minimum_overs)
}

fn completion_proxy(ctx: &MatchContext) -> Verdict {
    Verdict::stands_if(ctx.meets_pct(ctx.thresholds.completion_pct))
}

fn no_reduction(ctx: &MatchContext) -> Verdict {
    Verdict::stands_if(ctx.reduced_overs == ctx.original_overs)
}

fn if_declared(_ctx: &MatchContext) -> Verdict {
    Verdict::StandsIfDeclared
}

fn top_market(ctx: &MatchContext) -> Verdict {
    match ctx.thresholds.top_market_basis {
        TopMarketBasis::PercentOfOriginal => {
            Verdict::stands_if(ctx.meets_pct(ctx.thresholds.top_market_pct))
        }
        TopMarketBasis::FormatMinimum => {
            Verdict::stands_if(ctx.reduced_overs >= ctx.profile.top_market_minimum_overs)
        }
    }
}

fn match_happened(ctx: &MatchContext) -> Verdict {
    Verdict::stands_if(ctx.reduced_overs > 0)
}

fn overs_lost(ctx: &MatchContext) -> Verdict {
    Verdict::stands_if(ctx.overs_lost() < ctx.profile.reduction_void_threshold)
}

fn player_status(_ctx: &MatchContext) -> Verdict {
    Verdict::needs_info("need player status info")
}

fn first_segment(ctx: &MatchContext) -> Verdict {
    Verdict::stands_if(ctx.reduced_overs >= ctx.profile.segment_overs)
}

/// One entry of a rule table: display name plus the rule it runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketRule {
    pub id: MarketId,
    pub name: String,
}

impl MarketRule {
    pub fn new(id: MarketId) -> Self {
        Self {
            id,
            name: id.display_name().to_string(),
        }
    }

    pub fn named(id: MarketId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }

    pub fn decide(&self, ctx: &MatchContext) -> Verdict {
        self.id.decide(ctx)
    }
}

/// Ordered, immutable market catalog. Duplicate entries are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    version: String,
    rules: Vec<MarketRule>,
}

impl RuleTable {
    pub fn canonical() -> Self {
        Self {
            version: RULESET_VERSION.to_string(),
            rules: MarketId::ALL.iter().copied().map(MarketRule::new).collect(),
        }
    }

    pub fn from_rules(version: &str, rules: Vec<MarketRule>) -> Self {
        Self {
            version: version.to_string(),
            rules,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn rules(&self) -> &[MarketRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Short SHA-256 over the ordered (name, rule) pairs
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.version.as_bytes());
        for rule in &self.rules {
            hasher.update(b"\n");
            hasher.update(rule.name.as_bytes());
            hasher.update(b"\x1f");
            hasher.update(rule.id.as_str().as_bytes());
        }
        format!("{:x}", hasher.finalize())[..16].to_string()
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::canonical()
    }
}
