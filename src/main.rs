use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use finance_dashboard::config::AppConfig;
use finance_dashboard::dashboard::{Dashboard, WidgetEvent};
use finance_dashboard::models::filter::parse_date_bound;
use finance_dashboard::models::{FilterSpec, Granularity, TypeFilter, Views};
use finance_dashboard::persistence::Dataset;
use finance_dashboard::upstream::{probe_reference, ReferenceClient};
use finance_dashboard::{generate_table, render};

/// Synthetic transaction generator and filtering dashboard
#[derive(Parser)]
#[command(name = "finance-dashboard", version, long_about = None)]
struct Cli {
    /// TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate synthetic transactions and write them as CSV
    Generate {
        #[arg(short = 'n', long)]
        count: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also write the full records as JSON
        #[arg(long)]
        records_json: Option<PathBuf>,
        /// Call the reference API first (result is ignored)
        #[arg(long)]
        upstream: bool,
    },
    /// Compute the views for one set of filters
    Views {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        /// Repeat to select several categories
        #[arg(long = "category")]
        categories: Vec<String>,
        #[arg(long = "type", default_value = "all")]
        tx_type: String,
        #[arg(short, long)]
        granularity: Option<String>,
        /// Category slice clicked on the chart
        #[arg(long)]
        drill_down: Option<String>,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Read widget events as JSON lines from stdin and print views after each
    Session {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn print_views<W: Write>(out: &mut W, views: &Views, format: Format) -> Result<()> {
    match format {
        Format::Text => writeln!(out, "{}", render::render_views(views))?,
        Format::Json => writeln!(out, "{}", serde_json::to_string(views)?)?,
    }
    out.flush()?;
    Ok(())
}

async fn generate(
    config: AppConfig,
    count: Option<usize>,
    seed: Option<u64>,
    output: Option<PathBuf>,
    records_json: Option<PathBuf>,
    upstream: bool,
) -> Result<()> {
    let settings = config.generator;
    let count = count.unwrap_or(settings.count);
    let output = output.unwrap_or(settings.output);
    let records_json = records_json.or(settings.records_json);

    if upstream || config.upstream.enabled {
        let upstream = &config.upstream;
        match ReferenceClient::from_env(
            upstream.base_url.as_str(),
            &upstream.credential_env,
            Duration::from_secs(upstream.timeout_secs),
        ) {
            Ok(client) => probe_reference(&client, &upstream.query).await,
            Err(err) => warn!(error = %err, "skipping reference API call"),
        }
    }

    let seed = seed.or(settings.seed).unwrap_or_else(rand::random);
    info!(count, seed, output = %output.display(), "generating transactions");
    let mut rng = StdRng::seed_from_u64(seed);

    let file = File::create(&output)
        .with_context(|| format!("Failed to create output file '{}'", output.display()))?;
    let records = generate_table(&mut rng, count, chrono::Utc::now(), BufWriter::new(file))
        .context("Failed to generate transaction table")?;

    if let Some(path) = records_json {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create records file '{}'", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &records)
            .context("Failed to write records JSON")?;
        info!(path = %path.display(), "wrote full records");
    }

    Ok(())
}

fn load_dataset(input: &Path) -> Result<Dataset> {
    Dataset::load(input).with_context(|| format!("Failed to load table '{}'", input.display()))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load_or_default(cli.config.as_deref()).context("Failed to load config")?;

    match cli.command {
        Commands::Generate {
            count,
            seed,
            output,
            records_json,
            upstream,
        } => {
            generate(config, count, seed, output, records_json, upstream).await
        }
        Commands::Views {
            input,
            start,
            end,
            categories,
            tx_type,
            granularity,
            drill_down,
            format,
        } => {
            let dataset = load_dataset(&input)?;
            let mut spec = FilterSpec::initial(dataset.rows())
                .context("Transaction table has no rows")?
                .with_granularity(config.dashboard.granularity)
                .with_categories(categories)
                .with_type(tx_type.parse::<TypeFilter>()?);
            if let Some(start) = start {
                spec.start = parse_date_bound(&start)?;
            }
            if let Some(end) = end {
                spec.end = parse_date_bound(&end)?;
            }
            if let Some(granularity) = granularity {
                spec = spec.with_granularity(granularity.parse::<Granularity>()?);
            }
            if let Some(label) = drill_down {
                spec = spec.with_drill_down(label);
            }

            let dashboard = Dashboard::new(dataset, spec)?;
            print_views(&mut io::stdout().lock(), dashboard.views(), format)
        }
        Commands::Session { input, format } => {
            let dataset = load_dataset(&input)?;
            let (first, last) = dataset.date_bounds().context("Transaction table has no rows")?;
            info!(
                first = %first.date(),
                last = %last.date(),
                categories = ?dataset.categories(),
                "session options"
            );
            let spec = FilterSpec::initial(dataset.rows())
                .context("Transaction table has no rows")?
                .with_granularity(config.dashboard.granularity);
            let mut dashboard = Dashboard::new(dataset, spec)?;

            let mut out = io::stdout().lock();
            print_views(&mut out, dashboard.views(), format)?;

            for line in io::stdin().lock().lines() {
                let line = line.context("Failed to read event")?;
                if line.trim().is_empty() {
                    continue;
                }
                let outcome = serde_json::from_str::<WidgetEvent>(&line)
                    .map_err(anyhow::Error::from)
                    .and_then(|event| dashboard.dispatch_widget(event).map(|_| ()).map_err(Into::into));
                if let Err(err) = outcome {
                    // previous views stay on screen
                    error!(error = %err, "rejected event");
                    writeln!(out, "error: {}", err)?;
                }
                print_views(&mut out, dashboard.views(), format)?;
            }
            Ok(())
        }
    }
}
