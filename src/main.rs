use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use succession::{
    config::Config,
    input::{InputParser, ParseEvent},
    pedigree::Succession,
    reports::{GraphRenderer, ReportGenerator},
    types::PropagationPolicy,
};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "succession")]
#[command(about = "Find the claimant most closely related to a pedigree's founder")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level
    #[arg(short, long, default_value = "warn", global = true)]
    log_level: String,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the heir
    Heir {
        /// Input files, read in order (defaults to stdin)
        inputs: Vec<PathBuf>,

        /// Output format (text, json)
        #[arg(short, long)]
        format: Option<String>,

        /// Propagation algorithm
        #[arg(short, long, value_enum)]
        policy: Option<PropagationPolicy>,

        /// Write the pedigree as Graphviz DOT to this path
        #[arg(short, long)]
        graph_output: Option<PathBuf>,

        /// Also render the DOT file to an image (jpg, png, svg, pdf)
        #[arg(short, long)]
        image_format: Option<String>,
    },

    /// Print every person's relatedness to the founder
    Scores {
        /// Input files, read in order (defaults to stdin)
        inputs: Vec<PathBuf>,

        /// Output format (text, json)
        #[arg(short, long)]
        format: Option<String>,

        /// Propagation algorithm
        #[arg(short, long, value_enum)]
        policy: Option<PropagationPolicy>,
    },

    /// Initialize configuration file
    Init {
        /// Configuration file path
        #[arg(long, default_value = "succession.yml")]
        config_file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level)?;

    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Heir {
            inputs,
            format,
            policy,
            graph_output,
            image_format,
        } => {
            if let Some(format) = format {
                config.report.format = format;
            }
            if let Some(policy) = policy {
                config.propagation.policy = policy;
            }
            if let Some(path) = graph_output {
                config.graph_output.path = path;
                config.graph_output.enabled = true;
            }
            if image_format.is_some() {
                config.graph_output.image_format = image_format;
            }
            config.validate()?;

            print_heir(&inputs, &config)?;
        }

        Commands::Scores {
            inputs,
            format,
            policy,
        } => {
            if let Some(format) = format {
                config.report.format = format;
            }
            if let Some(policy) = policy {
                config.propagation.policy = policy;
            }
            config.validate()?;

            print_scores(&inputs, &config)?;
        }

        Commands::Init { config_file } => {
            init_config(config_file)?;
        }
    }

    Ok(())
}

/// Initialize tracing with the specified log level. Logs go to stderr so that
/// stdout carries only the report.
fn init_tracing(log_level: &str) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(log_level))
        .context("Failed to create env filter")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(env_filter)
        .init();

    Ok(())
}

/// Feed every input line to the parser, rendering the graph once the
/// relationships are complete if graph output is enabled.
fn read_succession(inputs: &[PathBuf], config: &Config) -> Result<Succession> {
    let renderer = config.graph_output.enabled.then(|| {
        GraphRenderer::new(
            &config.graph_output.path,
            config.graph_output.image_format.clone(),
        )
    });

    let mut parser = InputParser::new(Succession::new(config.propagation.policy));

    let readers: Vec<(String, Box<dyn BufRead>)> = if inputs.is_empty() {
        vec![("<stdin>".to_string(), Box::new(io::stdin().lock()) as Box<dyn BufRead>)]
    } else {
        inputs
            .iter()
            .map(|path| -> Result<(String, Box<dyn BufRead>)> {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open input: {:?}", path))?;
                Ok((path.display().to_string(), Box::new(BufReader::new(file)) as Box<dyn BufRead>))
            })
            .collect::<Result<_>>()?
    };

    for (source, reader) in readers {
        debug!("Reading input from {}", source);
        for line in reader.lines() {
            let line = line.with_context(|| format!("Failed to read from {}", source))?;
            let event = parser
                .parse_line(&line)
                .with_context(|| format!("Invalid input in {}", source))?;

            if event == ParseEvent::RelationshipsComplete {
                if let Some(renderer) = &renderer {
                    if let Err(e) = renderer.render(parser.succession().graph()) {
                        warn!("Failed to write pedigree graph: {}", e);
                    }
                }
            }
        }
    }

    Ok(parser.finish()?)
}

fn print_heir(inputs: &[PathBuf], config: &Config) -> Result<()> {
    let mut succession = read_succession(inputs, config)?;
    let report = succession.heir_report()?;

    let content = ReportGenerator::new().generate(&report, &config.report.format)?;
    println!("{}", content);
    Ok(())
}

fn print_scores(inputs: &[PathBuf], config: &Config) -> Result<()> {
    let mut succession = read_succession(inputs, config)?;
    let scores = succession.scores()?;

    let content = ReportGenerator::new().generate_scores(&scores, &config.report.format)?;
    println!("{}", content);
    Ok(())
}

/// Initialize configuration file
fn init_config(config_file: PathBuf) -> Result<()> {
    if config_file.exists() {
        return Err(anyhow::anyhow!(
            "Configuration file already exists: {:?}",
            config_file
        ));
    }

    Config::default()
        .save_to_file(&config_file)
        .with_context(|| format!("Failed to write configuration file: {:?}", config_file))?;

    info!("Configuration file created successfully: {:?}", config_file);
    println!("Configuration file created: {:?}", config_file);
    Ok(())
}
