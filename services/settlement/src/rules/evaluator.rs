//! Market rule evaluation over a single match context

use serde::{Deserialize, Serialize};

use crate::rules::catalog::{MarketId, RuleTable};
use crate::rules::context::MatchContext;
use crate::rules::goes_on::apply_goes_on;
use crate::rules::verdict::Verdict;

/// Final verdict for one catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketVerdict {
    /// 1-based position in catalog order
    pub rank: usize,
    pub market_id: MarketId,
    pub market: String,
    pub raw: Verdict,
    pub verdict: Verdict,
}

impl MarketVerdict {
    /// True when the goes-on pass changed the raw verdict
    pub fn was_masked(&self) -> bool {
        self.raw != self.verdict
    }
}

/// Evaluate every rule in `table` order, then apply the goes-on pass.
pub fn evaluate(ctx: &MatchContext, table: &RuleTable) -> Vec<MarketVerdict> {
    let verdicts: Vec<MarketVerdict> = table
        .rules()
        .iter()
        .enumerate()
        .map(|(idx, rule)| {
            let raw = rule.decide(ctx);
            let verdict = apply_goes_on(&rule.name, raw.clone(), &ctx.determined);

            tracing::debug!(
                market = %rule.name,
                raw = %raw,
                verdict = %verdict,
                "evaluated market"
            );

            MarketVerdict {
                rank: idx + 1,
                market_id: rule.id,
                market: rule.name.clone(),
                raw,
                verdict,
            }
        })
        .collect();

    tracing::info!(
        "Evaluated {} markets for {} {} -> {} overs (ruleset {})",
        verdicts.len(),
        ctx.format,
        ctx.original_overs,
        ctx.reduced_overs,
        table.version()
    );

    verdicts
}

/// Evaluate against the canonical catalog
pub fn evaluate_canonical(ctx: &MatchContext) -> Vec<MarketVerdict> {
    evaluate(ctx, &RuleTable::canonical())
}
