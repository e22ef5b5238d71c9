use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

use papercast_common::{AppConfig, PapercastError, SortOrder, Stage, TopicVocabulary};
use papercast_studio::bootstrap::build_studio;
use papercast_studio::{Progress, StudioOptions, TopicOutcome};

#[derive(Parser)]
#[command(name = "papercast")]
#[command(about = "Summarize research papers and turn them into podcast audio")]
#[command(version)]
struct Cli {
    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search arXiv, summarize the top papers and narrate a comparison
    Search {
        /// Free-text topic, e.g. "graph neural networks"
        topic: String,

        /// Number of papers to fetch [default: PAPERCAST_PAPER_COUNT or 3]
        #[arg(short, long)]
        count: Option<usize>,

        /// relevance, lastUpdatedDate or submittedDate
        #[arg(short, long)]
        sort: Option<SortOrder>,

        /// Also write cross_paper_summary.txt and the audio here
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Classify, summarize and narrate a local PDF
    Upload {
        /// Path to the PDF
        pdf: PathBuf,

        /// Comma-separated topic labels [default: PAPERCAST_TOPICS]
        #[arg(short, long)]
        topics: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Characters of extracted text to preview
        #[arg(long, default_value_t = 3000)]
        preview_chars: usize,

        /// Also write summary.txt and the audio here
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Before logging starts, so .env can set RUST_LOG and the log format.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(e) = init_tracing() {
        eprintln!("Error: failed to initialise logging: {e:#}");
        return ExitCode::from(1);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}

/// 2 for problems with what the user supplied, 1 for everything else.
fn exit_code(err: &anyhow::Error) -> u8 {
    let input_error = err
        .downcast_ref::<PapercastError>()
        .is_some_and(PapercastError::is_input_error);
    if input_error {
        2
    } else {
        1
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("papercast=info,ai_client=info"))?;
    let json = std::env::var("PAPERCAST_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::from_env()?;
    match cli.command {
        Command::Search {
            topic,
            count,
            sort,
            out_dir,
        } => {
            let options = StudioOptions {
                paper_count: count.unwrap_or(config.paper_count),
                sort_order: sort.unwrap_or(config.sort_order),
                ..StudioOptions::default()
            };
            search(&config, options, &topic, out_dir.as_deref(), cli.json).await
        }
        Command::Upload {
            pdf,
            topics,
            yes,
            preview_chars,
            out_dir,
        } => {
            let vocabulary = topics
                .as_deref()
                .map(TopicVocabulary::parse)
                .unwrap_or_else(|| config.topics.clone());
            let options = StudioOptions {
                preview_chars,
                ..StudioOptions::default()
            };
            upload(&config, options, &pdf, &vocabulary, yes, out_dir.as_deref(), cli.json).await
        }
    }
}

async fn search(
    config: &AppConfig,
    options: StudioOptions,
    topic: &str,
    out_dir: Option<&Path>,
    json: bool,
) -> Result<()> {
    let spinner = spinner(json)?;
    let studio = build_studio(config, options)?.with_progress(Arc::new(SpinnerProgress(spinner.clone())));

    let outcome = studio.run_topic(topic).await;
    spinner.finish_and_clear();
    let outcome = outcome?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{outcome}");
    }

    if let (TopicOutcome::Completed(report), Some(dir)) = (&outcome, out_dir) {
        save_outputs(dir, "cross_paper_summary", &report.synthesis.text, &report.audio.path).await?;
    }
    Ok(())
}

async fn upload(
    config: &AppConfig,
    options: StudioOptions,
    pdf: &Path,
    vocabulary: &TopicVocabulary,
    yes: bool,
    out_dir: Option<&Path>,
    json: bool,
) -> Result<()> {
    let spinner = spinner(json)?;
    let studio = build_studio(config, options)?.with_progress(Arc::new(SpinnerProgress(spinner.clone())));

    let pending = studio.ingest_file(pdf).await?;

    if !yes {
        let confirmed = spinner.suspend(|| {
            eprintln!("{pending}\n");
            Confirm::new()
                .with_prompt("Analyze and summarize this paper?")
                .default(true)
                .interact()
        });
        let confirmed = confirmed
            .context("confirmation prompt failed (pass --yes when not running in a terminal)")?;
        if !confirmed {
            spinner.finish_and_clear();
            eprintln!("Skipped; nothing was sent to the model.");
            return Ok(());
        }
    }

    let report = studio.analyze(pending, vocabulary).await;
    spinner.finish_and_clear();
    let report = report?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }

    if let Some(dir) = out_dir {
        save_outputs(dir, "summary", &report.summary, &report.audio.path).await?;
    }
    Ok(())
}

/// Copy the text and audio of a run to `{dir}/{stem}.txt` and `{dir}/{stem}.{ext}`.
async fn save_outputs(dir: &Path, stem: &str, text: &str, audio: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("creating {}", dir.display()))?;

    let text_path = dir.join(format!("{stem}.txt"));
    tokio::fs::write(&text_path, text)
        .await
        .with_context(|| format!("writing {}", text_path.display()))?;

    let ext = audio.extension().and_then(|e| e.to_str()).unwrap_or("mp3");
    let audio_path = dir.join(format!("{stem}.{ext}"));
    tokio::fs::copy(audio, &audio_path)
        .await
        .with_context(|| format!("copying audio to {}", audio_path.display()))?;

    info!(text = %text_path.display(), audio = %audio_path.display(), "Outputs saved");
    eprintln!("Saved {} and {}", text_path.display(), audio_path.display());
    Ok(())
}

fn spinner(hidden: bool) -> Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }
    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
    bar.enable_steady_tick(Duration::from_millis(120));
    Ok(bar)
}

struct SpinnerProgress(ProgressBar);

impl Progress for SpinnerProgress {
    fn stage(&self, stage: Stage, paper: Option<usize>) {
        let message = match paper {
            Some(n) => format!("Paper {n}: {stage}..."),
            None => format!("{stage}..."),
        };
        self.0.set_message(message);
    }
}
