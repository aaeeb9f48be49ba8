//! Report rendering for evaluated markets (text and JSONL)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

use crate::rules::context::MatchContext;
use crate::rules::evaluator::MarketVerdict;
use crate::rules::verdict::{ColorClass, Verdict};

/// One displayable row of a settlement report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLine {
    pub rank: usize,
    pub market: String,
    pub verdict: Verdict,
    pub text: String,
    pub color: ColorClass,
}

impl ReportLine {
    pub fn from_verdict(v: &MarketVerdict) -> Self {
        Self {
            rank: v.rank,
            market: v.market.clone(),
            verdict: v.verdict.clone(),
            text: v.verdict.text(),
            color: v.verdict.color(),
        }
    }

    pub fn render(&self) -> String {
        format!("{:02}. {} — {} [{}]", self.rank, self.market, self.text, self.color)
    }
}

pub fn build_report(verdicts: &[MarketVerdict]) -> Vec<ReportLine> {
    verdicts.iter().map(ReportLine::from_verdict).collect()
}

/// Status header, e.g. "ODI: 50 → 40 overs, reduction: Before start"
pub fn render_header(ctx: &MatchContext) -> String {
    format!(
        "{}: {} → {} overs, reduction: {}",
        ctx.format, ctx.original_overs, ctx.reduced_overs, ctx.stage
    )
}

pub fn render_text(lines: &[ReportLine]) -> String {
    lines
        .iter()
        .map(ReportLine::render)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Counts per color class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub total: usize,
    pub affirmative: usize,
    pub negative: usize,
    pub advisory: usize,
}

impl ReportSummary {
    pub fn from_lines(lines: &[ReportLine]) -> Self {
        let count = |c: ColorClass| lines.iter().filter(|l| l.color == c).count();
        Self {
            total: lines.len(),
            affirmative: count(ColorClass::Affirmative),
            negative: count(ColorClass::Negative),
            advisory: count(ColorClass::Advisory),
        }
    }
}

pub fn write_jsonl<W: Write>(writer: &mut W, lines: &[ReportLine]) -> Result<()> {
    for line in lines {
        let json = serde_json::to_string(line)?;
        writeln!(writer, "{}", json)?;
    }
    Ok(())
}

/// Write report lines to a JSONL file, creating parent directories
pub fn write_report_jsonl<P: AsRef<Path>>(path: P, lines: &[ReportLine]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::File::create(path)?;
    write_jsonl(&mut file, lines)?;

    tracing::info!("Wrote {} report lines to {:?}", lines.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::context::MatchFormat;
    use crate::rules::evaluator::evaluate_canonical;

    #[test]
    fn test_render_line() {
        let line = ReportLine {
            rank: 7,
            market: "Batter to Score 50+ Runs".to_string(),
            verdict: Verdict::DependsGoesOn,
            text: Verdict::DependsGoesOn.text(),
            color: ColorClass::Advisory,
        };
        assert_eq!(
            line.render(),
            "07. Batter to Score 50+ Runs — Depends — GOES-ON applies [advisory]"
        );
    }

    #[test]
    fn test_header() {
        let ctx = MatchContext::before_start(MatchFormat::Odi, 40).unwrap();
        assert_eq!(render_header(&ctx), "ODI: 50 → 40 overs, reduction: Before start");
    }

    #[test]
    fn test_full_report_text() {
        let ctx = MatchContext::before_start(MatchFormat::T20, 0).unwrap();
        let lines = build_report(&evaluate_canonical(&ctx));
        let text = render_text(&lines);

        assert!(text.starts_with("01. 1st Over Total Runs — STANDS [affirmative]"));
        assert!(text.contains("11. Player of the Match — STANDS (if declared) [advisory]"));
        assert!(text.contains("21. Bowler Match Bet — Depends (need player status info) [advisory]"));
        assert_eq!(text.lines().count(), 28);
    }

    #[test]
    fn test_summary_counts() {
        let ctx = MatchContext::before_start(MatchFormat::T20, 0).unwrap();
        let lines = build_report(&evaluate_canonical(&ctx));
        let summary = ReportSummary::from_lines(&lines);

        assert_eq!(summary.total, 28);
        assert_eq!(summary.negative, 0);
        // Player of the Match plus the two match bets
        assert_eq!(summary.advisory, 3);
        assert_eq!(summary.affirmative, 25);
    }

    #[test]
    fn test_write_jsonl() {
        let ctx = MatchContext::before_start(MatchFormat::Odi, 45).unwrap();
        let lines = build_report(&evaluate_canonical(&ctx));

        let mut buf = Vec::new();
        write_jsonl(&mut buf, &lines).unwrap();
        let out = String::from_utf8(buf).unwrap();

        assert_eq!(out.lines().count(), 28);
        let first: ReportLine = serde_json::from_str(out.lines().next().unwrap()).unwrap();
        assert_eq!(first, lines[0]);
    }

    #[test]
    fn test_write_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("odi.jsonl");
        let ctx = MatchContext::before_start(MatchFormat::Odi, 20).unwrap();
        let lines = build_report(&evaluate_canonical(&ctx));

        write_report_jsonl(&path, &lines).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 28);
    }
}
