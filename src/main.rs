mod error;
mod parser;
mod rank;
mod report;
mod scoring;
mod settings;
mod source;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use settings::{HeadingRule, InputConfig, PipelineConfig, SnippetStrategy};
use source::{AutoSource, TextSource};

#[derive(Parser)]
#[command(name = "pdf_ranker", about = "Rank PDF sections by keyword relevance for a persona and task")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every listed document and write the ranked JSON summary
    Run {
        /// Input config: documents, persona, job_to_be_done
        #[arg(short, long)]
        input: PathBuf,
        /// Directory the listed filenames are resolved against
        #[arg(short = 'd', long)]
        pdf_dir: PathBuf,
        /// Output JSON file (parent directories are created)
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        pipeline: PipelineArgs,
        /// Max entries in each output list
        #[arg(short = 'n', long)]
        top: Option<usize>,
        /// Extract documents one at a time
        #[arg(long)]
        sequential: bool,
    },
    /// Segment a single document and print its sections and snippets
    Inspect {
        file: PathBuf,
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Show the active weighted keyword set
    Keywords {
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
}

#[derive(Args)]
struct PipelineArgs {
    /// Pipeline config file (TOML/JSON/YAML); RANKER_* env vars override it
    #[arg(short, long)]
    pipeline: Option<PathBuf>,
    /// Snippet capture strategy
    #[arg(short, long, value_enum)]
    strategy: Option<SnippetStrategy>,
    /// Minimum heading score that opens a section
    #[arg(short, long)]
    threshold: Option<u32>,
    /// Which lines may open a section
    #[arg(long, value_enum)]
    heading_rule: Option<HeadingRule>,
}

impl PipelineArgs {
    fn load(&self) -> anyhow::Result<PipelineConfig> {
        let mut cfg = PipelineConfig::load(self.pipeline.as_deref())?;
        if let Some(strategy) = self.strategy {
            cfg.snippet_strategy = strategy;
        }
        if let Some(threshold) = self.threshold {
            cfg.heading_threshold = threshold;
        }
        if let Some(rule) = self.heading_rule {
            cfg.heading_rule = rule;
        }
        Ok(cfg)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            input,
            pdf_dir,
            output,
            pipeline,
            top,
            sequential,
        } => {
            let mut cfg = pipeline.load()?;
            if let Some(n) = top {
                cfg.top_n = n;
            }
            if sequential {
                cfg.parallel = false;
            }
            run(&input, &pdf_dir, &output, &cfg)
        }
        Commands::Inspect { file, pipeline } => inspect(&file, &pipeline.load()?),
        Commands::Keywords { pipeline } => {
            let cfg = pipeline.load()?;
            let keywords = cfg.keyword_set()?;
            println!("{:<16} | {:>6}", "Keyword", "Weight");
            println!("{}", "-".repeat(25));
            for kw in keywords.keywords() {
                println!("{:<16} | {:>6}", kw.term, kw.weight);
            }
            println!("\n{} keywords ({:?} preset)", keywords.len(), cfg.keyword_preset);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn run(input_path: &Path, pdf_dir: &Path, output: &Path, cfg: &PipelineConfig) -> anyhow::Result<()> {
    let input = InputConfig::load(input_path)?;
    let keywords = cfg.keyword_set()?;
    info!(
        documents = input.documents.len(),
        strategy = ?cfg.snippet_strategy,
        threshold = cfg.heading_threshold,
        heading_rule = ?cfg.heading_rule,
        "Starting run"
    );

    let ranked = rank::aggregate(&input, pdf_dir, cfg, &keywords, &AutoSource)?;
    let out = report::RunOutput::build(&input, &ranked, chrono::Utc::now());
    out.write(output)
        .with_context(|| format!("writing {}", output.display()))?;

    println!(
        "Processed {} documents ({} skipped): {} sections, {} snippets; kept top {}/{}.",
        ranked.processed,
        ranked.skipped.len(),
        ranked.total_sections,
        ranked.total_snippets,
        out.extracted_sections.len(),
        out.subsection_analysis.len(),
    );
    println!("Output written to {}", output.display());
    Ok(())
}

fn inspect(file: &Path, cfg: &PipelineConfig) -> anyhow::Result<()> {
    let keywords = cfg.keyword_set()?;
    let text = AutoSource
        .extract(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let data = parser::process_document(&name, &text, &keywords, cfg);

    println!("{} ({} pages)\n", name, text.total_pages);
    println!("{:>4} | {:>5} | {:<48} | {:>5}", "Page", "Score", "Section", "Body");
    println!("{}", "-".repeat(72));
    for s in &data.sections {
        println!(
            "{:>4} | {:>5} | {:<48} | {:>5}",
            s.page,
            s.score,
            truncate(&s.title, 48),
            s.body.chars().count()
        );
    }

    println!("\n--- Snippets ({:?}) ---", cfg.snippet_strategy);
    for s in &data.snippets {
        println!("  p{} [{}] {}", s.page, s.score, truncate(&s.text, 80));
    }

    println!("\n{} sections | {} snippets", data.sections.len(), data.snippets.len());
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
