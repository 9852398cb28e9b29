//! # CLI Module
//!
//! Command-line interface for the crop collage planner.
//!
//! ## Usage
//! ```bash
//! # Plan a collage from crops under ./data/{faces,objects}/<image name>/
//! crop-collage plan ./images
//!
//! # Reproducible run with a stricter face threshold
//! crop-collage plan ./images --crops ./data --seed 7 --face-threshold 0.3
//!
//! # JSON output for a renderer
//! crop-collage plan ./images --output json > plan.json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use crop_collage::config::CollageConfig;
use crop_collage::core::coloring::GroupingMode;
use crop_collage::core::comparator::PerceptualDistance;
use crop_collage::core::crop::CropKind;
use crop_collage::core::pipeline::{CollagePipeline, CollagePlan, MatchStage};
use crop_collage::core::source::{discover_parent_images, DirectoryCropSource};
use crop_collage::error::Result;
use crop_collage::events::{Event, EventChannel, LoadEvent, MatchEvent, PipelineEvent};
use crop_collage::init_tracing;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Crop Collage - link look-alike faces and objects across your photos
#[derive(Parser, Debug)]
#[command(name = "crop-collage")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Find similar crops and plan a collage
    Plan {
        /// Directory of parent images
        images: PathBuf,

        /// Root of the crop records (<crops>/faces/<image>/, <crops>/objects/<image>/)
        #[arg(long, default_value = "data")]
        crops: PathBuf,

        /// Number of parent images to sample
        #[arg(short, long)]
        sample: Option<usize>,

        /// RNG seed for sampling, colors and jitter
        #[arg(long)]
        seed: Option<u64>,

        /// Face similarity threshold (0-1, lower = stricter)
        #[arg(long)]
        face_threshold: Option<f64>,

        /// Object similarity threshold (0-1, lower = stricter)
        #[arg(long)]
        object_threshold: Option<f64>,

        /// Parent images closer than this are treated as the same photo
        #[arg(long)]
        coarse_threshold: Option<f64>,

        /// How linked crops are grouped for coloring
        #[arg(short, long)]
        grouping: Option<Grouping>,

        /// Config file (default: <config dir>/crop-collage/config.json)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Grouping {
    /// First matching group wins; groups are never merged (default)
    ScanOrder,
    /// Full transitive closure of the links
    DisjointSet,
}

impl From<Grouping> for GroupingMode {
    fn from(grouping: Grouping) -> Self {
        match grouping {
            Grouping::ScanOrder => GroupingMode::ScanOrder,
            Grouping::DisjointSet => GroupingMode::DisjointSet,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// The full plan as JSON
    Json,
    /// One pair per line
    Minimal,
}

/// Command-line values that override the loaded config
struct Overrides {
    sample: Option<usize>,
    seed: Option<u64>,
    face_threshold: Option<f64>,
    object_threshold: Option<f64>,
    coarse_threshold: Option<f64>,
    grouping: Option<Grouping>,
}

impl Overrides {
    fn apply(self, mut config: CollageConfig) -> CollageConfig {
        if let Some(sample) = self.sample {
            config.sample = sample;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(threshold) = self.face_threshold {
            config.face_threshold = threshold;
        }
        if let Some(threshold) = self.object_threshold {
            config.object_threshold = threshold;
        }
        if let Some(threshold) = self.coarse_threshold {
            config.coarse_threshold = threshold;
        }
        if let Some(grouping) = self.grouping {
            config.grouping = grouping.into();
        }
        config
    }
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Plan {
            images,
            crops,
            sample,
            seed,
            face_threshold,
            object_threshold,
            coarse_threshold,
            grouping,
            config,
            output,
            verbose,
        } => {
            init_tracing(if verbose { "debug" } else { "warn" })?;

            let loaded = match config {
                Some(path) => CollageConfig::load(&path)?,
                None => CollageConfig::discover()?,
            };
            let config = Overrides {
                sample,
                seed,
                face_threshold,
                object_threshold,
                coarse_threshold,
                grouping,
            }
            .apply(loaded);
            config.validate()?;

            run_plan(&images, crops, config, output, verbose)
        }
    }
}

fn run_plan(
    images: &Path,
    crops: PathBuf,
    config: CollageConfig,
    output: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let term = Term::stderr();

    // Print header
    if matches!(output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("Crop Collage").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let parents = discover_parent_images(images)?;

    let pipeline = CollagePipeline::builder()
        .parents(parents)
        .sample(config.sample)
        .source(Box::new(DirectoryCropSource::new(crops)))
        .stage(MatchStage::new(
            CropKind::Faces,
            config.face_threshold,
            Box::new(PerceptualDistance::default()),
        ))
        .stage(MatchStage::new(
            CropKind::Objects,
            config.object_threshold,
            Box::new(PerceptualDistance::default()),
        ))
        .coarse(Box::new(PerceptualDistance::default()))
        .coarse_threshold(config.coarse_threshold)
        .palette(config.palette.clone())
        .grouping(config.grouping)
        .canvas(config.canvas)
        .seed(config.seed)
        .build();

    // Set up event handling
    let (sender, receiver) = EventChannel::new();

    // Spinner for pretty output
    let progress = if matches!(output, OutputFormat::Pretty) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        let Some(pb) = progress_clone else {
            for _ in receiver.iter() {}
            return;
        };
        for event in receiver.iter() {
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    pb.set_message(format!("{}", phase));
                }
                Event::Load(LoadEvent::ParentLoaded {
                    parent,
                    kind,
                    completed,
                    ..
                }) if verbose => {
                    pb.set_message(format!(
                        "Loading {} ({}, {} done)",
                        parent.file_name().unwrap_or_default().to_string_lossy(),
                        kind,
                        completed
                    ));
                }
                Event::Match(MatchEvent::Started { kind, total_items }) => {
                    pb.set_message(format!("Matching {} {}", total_items, kind));
                }
                Event::Pipeline(PipelineEvent::Completed { .. })
                | Event::Pipeline(PipelineEvent::Error { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    // Run the pipeline
    let result = pipeline.run_with_events(&sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();

    let plan = result?;

    // Output results
    match output {
        OutputFormat::Pretty => print_pretty_results(&term, &plan, verbose),
        OutputFormat::Json => print_json_results(&plan)?,
        OutputFormat::Minimal => print_minimal_results(&plan),
    }

    Ok(())
}

fn print_pretty_results(term: &Term, plan: &CollagePlan, verbose: bool) {
    term.write_line(&format!("{} Plan Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    // Summary
    term.write_line(&format!(
        "  {} parent images, {} crops loaded in {:.1}s",
        style(plan.stats.parents).cyan(),
        style(plan.stats.crops_loaded).cyan(),
        plan.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line(&format!(
        "  {} similar pairs across {} crops",
        style(plan.pairs.len()).cyan(),
        style(plan.items.len()).cyan()
    ))
    .ok();
    term.write_line(&format!(
        "  {} images placed, {} links",
        style(plan.placements.len()).cyan(),
        style(plan.links.len()).cyan()
    ))
    .ok();
    term.write_line("").ok();

    if plan.is_empty() {
        term.write_line(&format!(
            "  {}",
            style("No similar crops found, nothing to arrange.").yellow()
        ))
        .ok();
        return;
    }

    term.write_line(&format!("{}", style("Pairs:").bold().underlined()))
        .ok();
    for pair in &plan.pairs {
        let color = plan
            .colors
            .get(pair.a())
            .map(|color| color.to_string())
            .unwrap_or_default();
        term.write_line(&format!(
            "  {} {} {}  {}",
            style(describe(plan, pair.a())).bold(),
            style("↔").dim(),
            style(describe(plan, pair.b())).bold(),
            style(color).dim()
        ))
        .ok();
    }
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} {}",
        style("Walk:").dim(),
        plan.ordering.join(" → ")
    ))
    .ok();

    if verbose {
        term.write_line("").ok();
        term.write_line(&format!("{}", style("Placements:").bold().underlined()))
            .ok();
        for placement in &plan.placements {
            let source = plan
                .items
                .get(&placement.id)
                .map(|item| display_path(&item.source_path))
                .unwrap_or_default();
            term.write_line(&format!(
                "  {:>5} at ({}, {}) {}x{}  {}",
                placement.id,
                placement.position.0,
                placement.position.1,
                placement.size.0,
                placement.size.1,
                style(source).dim()
            ))
            .ok();
        }
    }
}

/// `id (crop file name)`
fn describe(plan: &CollagePlan, id: &str) -> String {
    match plan.items.get(id) {
        Some(item) => format!(
            "{} ({})",
            id,
            item.path.file_name().unwrap_or_default().to_string_lossy()
        ),
        None => id.to_string(),
    }
}

fn display_path(path: &Path) -> String {
    let home = dirs::home_dir().unwrap_or_default();
    match path.strip_prefix(&home) {
        Ok(relative) if !home.as_os_str().is_empty() => format!("~/{}", relative.display()),
        _ => path.display().to_string(),
    }
}

fn print_json_results(plan: &CollagePlan) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(plan)?);
    Ok(())
}

fn print_minimal_results(plan: &CollagePlan) {
    for pair in &plan.pairs {
        println!("{} {}", pair.a(), pair.b());
    }
}
