use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;

use drawcheck_cli::init_logging;
use drawcheck_core::{
    DocumentReviewer, InputFormat, Report, ReportFormat, ReviewConfig, ReviewOptions,
};

#[derive(Parser)]
#[command(name = "drawcheck")]
#[command(about = "Review engineering-drawing text against AED and ASME Y14 rule sets")]
struct Args {
    /// Text blocks to review (JSON extractor output or a plain text dump)
    #[arg(short, long)]
    input: Option<String>,

    /// How to read the input: auto, json, or text
    #[arg(long, default_value = "auto")]
    input_format: String,

    /// Rule set to evaluate (defaults to the configured default, "AED")
    #[arg(short, long)]
    rule_set: Option<String>,

    /// Path to custom config file (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Only review blocks from this page
    #[arg(short, long)]
    page: Option<u32>,

    /// Report format: summary, full, or text
    #[arg(short = 'f', long, default_value = "summary")]
    format: String,

    /// Output file path (auto-generated from the input name if not specified)
    #[arg(short, long)]
    output: Option<String>,

    /// List the available rule sets and exit
    #[arg(long)]
    list_rule_sets: bool,

    /// Show usage notes and exit
    #[arg(long)]
    show_help: bool,

    /// Print per-step and per-rule timings
    #[arg(long)]
    profile: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Exit with status 2 when any check fails
    #[arg(long)]
    fail_on_violation: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(args.log_json) {
        eprintln!("⚠️  {e}");
    }

    match run(&args) {
        Ok(report) => {
            if args.fail_on_violation && !report.all_passed() {
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("❌ Review failed: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(args: &Args) -> Result<Report> {
    println!("📐 Drawcheck Drawing Reviewer");

    if args.show_help {
        show_help();
        return Ok(Report::empty());
    }

    // A bad --config is fatal; no --config means built-in defaults
    let config = match &args.config {
        Some(path) => {
            let config = ReviewConfig::load_from_file(path)?;
            println!("📋 Loaded config from: {path}");
            config
        }
        None => {
            println!("📋 Using default config");
            ReviewConfig::default()
        }
    };
    let reviewer = DocumentReviewer::from_config(&config)?;

    if args.list_rule_sets {
        list_rule_sets(&reviewer);
        return Ok(Report::empty());
    }

    let input = args
        .input
        .as_deref()
        .context("--input is required (see --show-help)")?;
    if !Path::new(input).exists() {
        anyhow::bail!("input not found at: {input}");
    }

    let format: ReportFormat = args.format.parse()?;
    let options = ReviewOptions {
        page: args.page,
        input_format: args.input_format.parse::<InputFormat>()?,
        profile: args.profile,
    };
    let rule_set = args
        .rule_set
        .clone()
        .unwrap_or_else(|| reviewer.catalog().default_set().to_string());

    tracing::debug!(rule_set = %rule_set, input, ?options, "starting review");
    println!("📄 Reviewing: {input}");
    println!("📏 Rule set: {rule_set}");
    if let Some(page) = args.page {
        println!("📑 Page: {page}");
    }
    if !reviewer.catalog().contains(&rule_set) {
        println!("⚠️  Unknown rule set '{rule_set}', no checks will run");
    }

    let report = reviewer.review_file(input, &rule_set, &options)?;
    print_outcome(&report);

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(input, format));
    report
        .save_with_format(&output_path, format)
        .with_context(|| format!("writing report to {output_path}"))?;
    println!("💾 Report saved to: {output_path}");

    Ok(report)
}

fn print_outcome(report: &Report) {
    if report.all_passed() {
        println!("✅ {}", report.score_line());
        return;
    }
    println!("⚠️  {}", report.score_line());
    for failed in &report.failed {
        println!("   ❌ {}: {}", failed.rule, failed.problem);
    }
}

fn default_output_path(input: &str, format: ReportFormat) -> String {
    let input_name = Path::new(input)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("drawing");
    let extension = match format {
        ReportFormat::Text => "txt",
        ReportFormat::Summary | ReportFormat::Full => "json",
    };
    format!("{input_name}_drawcheck.{extension}")
}

fn list_rule_sets(reviewer: &DocumentReviewer) {
    let catalog = reviewer.catalog();
    println!("\n📚 Available Rule Sets:");
    for name in catalog.names() {
        let marker = if name == catalog.default_set() { " (default)" } else { "" };
        let set = catalog.get(name);
        println!("  {name}{marker} - {} checks", set.len());
        for rule in &set.rules {
            println!("    • {} ({})", rule.name(), rule.id());
        }
    }
}

fn show_help() {
    println!("\n📋 Available Options:");
    println!("  --input <path>          Text blocks to review (.json or .txt)");
    println!("  --input-format <fmt>    auto (by extension), json, or text");
    println!("  --rule-set <name>       Rule set to evaluate (default: AED)");
    println!("  --config <path>         Load custom config file");
    println!("  --page <n>              Only review blocks from page n");
    println!("  --format <fmt>          Report format: summary, full, or text");
    println!("  --output <path>         Output file path (auto-generated if not specified)");
    println!("  --list-rule-sets        List rule sets and their checks");
    println!("  --profile               Print per-step and per-rule timings");
    println!("  --log-json              Emit logs as JSON lines on stderr");
    println!("  --fail-on-violation     Exit with status 2 when any check fails");

    println!("\n📄 Report Formats:");
    println!("  summary  - rule, passed, and problem per check plus counts (default)");
    println!("  full     - every verdict with its typed details or error");
    println!("  text     - human-readable listing with a pass score");

    println!("\n🧾 Input Shapes:");
    println!("  JSON  - [{{\"page\": 1, \"x0\": .., \"y0\": .., \"x1\": .., \"y1\": .., \"text\": \"..\"}}]");
    println!("  Text  - whole dump treated as one block spanning y0=0 to y1=1000");

    println!("\n📝 Usage Examples:");
    println!("  drawcheck -i drawing.json");
    println!("  drawcheck -i drawing.json -r \"ASME Y14\" -f text");
    println!("  drawcheck -i drawing.txt -c review.yaml --fail-on-violation");
}
