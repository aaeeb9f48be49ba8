//! Reduced-overs settlement CLI
//!
//! Usage:
//!   settlement_eval evaluate --format odi --reduced 40
//!   settlement_eval evaluate --format t20 --reduced 12 --stage first-innings --overs-done 4.2
//!   settlement_eval evaluate --format odi --reduced 30 --wicket-fallen --json
//!   settlement_eval catalog
//!   settlement_eval usage

use anyhow::Result;
use clap::{Parser, Subcommand};

use settlement::config::Config;
use settlement::rules::{
    build_report, evaluate, is_goes_on_market, render_header, render_text, write_jsonl,
    write_report_jsonl, DeterminedFlags, MatchContext, MatchRequest, ReportSummary, RuleTable,
};
use settlement::usage::{counter_from_config, record_best_effort};

#[derive(Parser)]
#[command(name = "settlement_eval")]
#[command(about = "Cricket reduced-overs market settlement evaluator")]
struct Cli {
    /// Path to settlement TOML config (built-in defaults when omitted)
    #[arg(long, global = true)]
    config: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate every market for a reduced match
    Evaluate {
        /// T20 or ODI
        #[arg(long)]
        format: Option<String>,
        /// Overs the match was reduced to (0 means no reduction)
        #[arg(long)]
        reduced: Option<i64>,
        /// before-start, first-innings or second-innings
        #[arg(long)]
        stage: Option<String>,
        #[arg(long)]
        overs_done: Option<f64>,
        #[arg(long)]
        line_passed: bool,
        #[arg(long)]
        wicket_fallen: bool,
        #[arg(long)]
        partnership_determined: bool,
        /// Emit JSON Lines instead of text
        #[arg(long)]
        json: bool,
        /// Also write the report to this JSONL file
        #[arg(long)]
        out: Option<String>,
    },
    /// List the market catalog
    Catalog,
    /// Show the usage counter
    Usage,
}

#[allow(clippy::too_many_arguments)]
fn run_evaluate_command(
    config: &Config,
    format: Option<String>,
    reduced: Option<i64>,
    stage: Option<String>,
    overs_done: Option<f64>,
    determined: DeterminedFlags,
    json: bool,
    out: Option<String>,
) -> Result<()> {
    if format.is_none() || reduced.is_none() {
        eprintln!("Select a format (--format T20|ODI) and enter reduced overs (--reduced N) before evaluating.");
        std::process::exit(2);
    }

    let request = MatchRequest {
        format,
        reduced_overs: reduced,
        stage,
        overs_done,
        determined,
    };
    let ctx = MatchContext::from_request(&request, config)?;
    tracing::info!(
        "Evaluating format={}, stage={:?}, reduced={}",
        ctx.format,
        ctx.stage,
        ctx.reduced_overs
    );

    let table = RuleTable::canonical();
    let verdicts = evaluate(&ctx, &table);
    let lines = build_report(&verdicts);

    if json {
        write_jsonl(&mut std::io::stdout().lock(), &lines)?;
    } else {
        println!("=== Status ===");
        println!("{}", render_header(&ctx));
        println!("Ruleset: {} ({})", table.version(), table.fingerprint());
        println!();
        println!("{}", render_text(&lines));

        let summary = ReportSummary::from_lines(&lines);
        println!();
        println!(
            "Stands: {} | Void: {} | Depends: {}",
            summary.affirmative, summary.negative, summary.advisory
        );
    }

    if let Some(path) = out {
        write_report_jsonl(&path, &lines)?;
    }

    let counter = counter_from_config(&config.usage);
    record_best_effort(counter.as_ref());

    Ok(())
}

fn run_catalog_command() {
    let table = RuleTable::canonical();
    println!("Ruleset: {} ({})", table.version(), table.fingerprint());
    for (idx, rule) in table.rules().iter().enumerate() {
        let goes_on = if is_goes_on_market(&rule.name) { " [goes-on]" } else { "" };
        println!(
            "{:02}. {} — {}{}",
            idx + 1,
            rule.name,
            rule.id.family().describe(),
            goes_on
        );
    }
}

fn run_usage_command(config: &Config) -> Result<()> {
    let counter = counter_from_config(&config.usage);
    println!("Evaluations recorded: {}", counter.current()?);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Evaluate {
            format,
            reduced,
            stage,
            overs_done,
            line_passed,
            wicket_fallen,
            partnership_determined,
            json,
            out,
        } => {
            let determined = DeterminedFlags {
                line_already_passed: line_passed,
                wicket_already_fallen: wicket_fallen,
                opening_partnership_already_determined: partnership_determined,
            };
            run_evaluate_command(&config, format, reduced, stage, overs_done, determined, json, out)?;
        }
        Commands::Catalog => run_catalog_command(),
        Commands::Usage => run_usage_command(&config)?,
    }

    Ok(())
}
