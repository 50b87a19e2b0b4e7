//! exam-concepts CLI: concept extraction for exam question banks.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use exam_concepts::batch::BatchProcessor;
use exam_concepts::config::{OutputFormat, ProjectConfig, DEFAULT_CONFIG_FILE};
use exam_concepts::evaluate::{compare_methods, performance_report};
use exam_concepts::extractor::{build_extractor, ExtractionMethod};
use exam_concepts::report::{self, Analytics};

#[derive(Parser)]
#[command(name = "exam-concepts", version, about = "Concept extraction for exam questions")]
struct Cli {
    /// Configuration file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Log progress (info level) unless RUST_LOG says otherwise.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract concepts for every question of one subject.
    Extract {
        /// Subject name (reads `<resources_dir>/<subject>.csv`).
        #[arg(long)]
        subject: String,

        /// Use the LLM strategy selected by `llm.provider`.
        #[arg(long)]
        use_llm: bool,

        #[arg(long, value_enum)]
        output_format: Option<OutputFormat>,

        #[arg(long)]
        confidence_threshold: Option<f32>,

        #[arg(long)]
        max_concepts: Option<usize>,

        /// Also write a detailed analytics JSON.
        #[arg(long)]
        analytics: bool,
    },

    /// Extract concepts from a single question given on the command line.
    Text {
        question: String,

        #[arg(long)]
        use_llm: bool,

        /// Print confidence and extraction method per concept.
        #[arg(long)]
        with_confidence: bool,

        /// Keyword dictionary CSV for the hybrid strategy.
        #[arg(long)]
        dictionary: Option<PathBuf>,
    },

    /// Process several subjects and write a batch summary.
    Batch {
        /// Subjects to process (default: every CSV in the resources directory).
        #[arg(long, num_args = 1..)]
        subjects: Vec<String>,

        #[arg(long)]
        use_llm: bool,

        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Compare the hybrid and LLM strategies on one subject.
    Compare {
        #[arg(long)]
        subject: String,
    },

    /// Compare strategies across subjects and write a performance report.
    Report {
        #[arg(
            long,
            num_args = 1..,
            default_values = ["ancient_history", "economics", "mathematics", "physics"]
        )]
        subjects: Vec<String>,

        #[arg(long, default_value = "performance_report.json")]
        output: PathBuf,
    },

    /// Manage the configuration file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a default config file and create the configured directories.
    Init,
    /// Print the effective configuration.
    Show,
    /// Report configuration problems.
    Validate,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Init => {
                let config = ProjectConfig::default();
                config.save(&cli.config)?;
                config.create_directories()?;
                println!("Default configuration created: {}", cli.config.display());
            }
            ConfigAction::Show => {
                let config = ProjectConfig::load_or_default(&cli.config)?;
                print!("{}", config.to_toml()?);
            }
            ConfigAction::Validate => {
                let config = ProjectConfig::load_or_default(&cli.config)?;
                let issues = config.validate();
                if issues.is_empty() {
                    println!("Configuration is valid.");
                } else {
                    println!("Configuration issues found:");
                    for issue in &issues {
                        println!("  - {issue}");
                    }
                    miette::bail!("{} configuration issue(s)", issues.len());
                }
            }
        },

        Commands::Extract {
            subject,
            use_llm,
            output_format,
            confidence_threshold,
            max_concepts,
            analytics,
        } => {
            let mut config = ProjectConfig::load_or_default(&cli.config)?;
            if let Some(t) = confidence_threshold {
                config.extraction.confidence_threshold = t;
            }
            if let Some(n) = max_concepts {
                config.extraction.max_concepts = n;
            }
            let format = output_format.unwrap_or(config.extraction.output_format);
            let method = ExtractionMethod::from_use_llm(use_llm);

            let processor = BatchProcessor::new(&config, method);
            let (rows, stats) = processor.process_subject(&subject)?;

            let output_dir = &config.directories.output_dir;
            let base = format!("{subject}_concepts");
            if format.writes_csv() {
                let path = output_dir.join(format!("{base}.csv"));
                report::write_csv(&path, &rows)?;
                println!("Results saved to CSV: {}", path.display());
            }
            if format.writes_json() {
                let path = output_dir.join(format!("{base}.json"));
                report::write_json(&path, &report::questions_json(&rows))?;
                println!("Results saved to JSON: {}", path.display());
            }

            println!("\n=== CONCEPT EXTRACTION RESULTS ===");
            println!("Subject: {}", subject.replace('_', " "));
            println!("Method: {}", method.description());
            println!("Processing time: {:.2} seconds", stats.processing_time_seconds);

            println!("\n--- Sample Extracted Concepts ---");
            for row in rows.iter().take(3) {
                let preview: String = row.question.chars().take(100).collect();
                println!("\nQ{}: {preview}...", row.number);
                println!("Concepts: {}", row.concepts_cell());
            }

            let details = Analytics::compute(
                &subject,
                method.description(),
                &rows,
                std::time::Duration::from_secs_f64(stats.processing_time_seconds),
            );
            println!("\n--- Analytics Summary ---");
            println!("Total questions processed: {}", details.total_questions);
            println!("Questions with extracted concepts: {}", details.questions_with_concepts);
            println!("Coverage: {:.1}%", details.coverage_percentage);
            println!("Average concepts per question: {:.1}", details.avg_concepts_per_question);
            println!("Maximum concepts in single question: {}", details.max_concepts_single_question);

            if analytics {
                println!("\n--- Detailed Analytics ---");
                println!("Total unique concepts extracted: {}", stats.unique_concepts_count);
                println!("Most frequent concepts:");
                for (concept, count) in details.concept_frequency.iter().take(5) {
                    println!("  - {concept}: {count} times");
                }
                let path = output_dir.join(format!("analytics_{subject}.json"));
                report::write_json(&path, &details)?;
                println!("Detailed analytics saved to: {}", path.display());
            }

            println!("\n=== PROCESSING COMPLETE ===");
        }

        Commands::Text {
            question,
            use_llm,
            with_confidence,
            dictionary,
        } => {
            let config = ProjectConfig::load_or_default(&cli.config)?;
            let extractor = build_extractor(
                ExtractionMethod::from_use_llm(use_llm),
                &config.extraction,
                &config.llm,
                dictionary.as_deref(),
            )?;
            if with_confidence {
                let details = extractor.extract_with_confidence(&question);
                let json = serde_json::to_string_pretty(&details).into_diagnostic()?;
                println!("{json}");
            } else {
                for concept in extractor.extract(&question) {
                    println!("{concept}");
                }
            }
        }

        Commands::Batch {
            subjects,
            use_llm,
            output_dir,
        } => {
            let config = ProjectConfig::load_or_default(&cli.config)?;
            let mut processor = BatchProcessor::new(&config, ExtractionMethod::from_use_llm(use_llm));
            if let Some(dir) = output_dir {
                processor = processor.with_output_dir(dir);
            }
            let subjects = (!subjects.is_empty()).then_some(subjects.as_slice());
            let summary = processor.run(subjects)?;

            println!("\n=== BATCH PROCESSING SUMMARY ===");
            println!("Timestamp: {}", summary.timestamp);
            println!(
                "Subjects processed: {}/{}",
                summary.successful_subjects, summary.total_subjects_processed
            );
            println!(
                "Total questions: {}",
                summary.overall_statistics.total_questions_processed
            );
            println!(
                "Total unique concepts: {}",
                summary.overall_statistics.total_unique_concepts
            );
            if summary.failed_subjects > 0 {
                println!("\nFailed subjects:");
                for (subject, error) in summary.failures() {
                    println!("  - {subject}: {error}");
                }
            }
            println!(
                "\nBatch processing complete! Results saved to {}/",
                processor.output_dir().display()
            );
        }

        Commands::Compare { subject } => {
            let config = ProjectConfig::load_or_default(&cli.config)?;
            let comparison = compare_methods(&config, &subject)?;
            let json = serde_json::to_string_pretty(&comparison).into_diagnostic()?;
            println!("{json}");
        }

        Commands::Report { subjects, output } => {
            let config = ProjectConfig::load_or_default(&cli.config)?;
            let perf = performance_report(&config, &subjects);
            report::write_json(&output, &perf)?;
            if let Some(insights) = &perf.overall_insights {
                println!("Recommendation: {}", insights.recommendation);
            }
            println!("Performance report generated: {}", output.display());
        }
    }

    Ok(())
}
