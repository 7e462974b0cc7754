use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use siteprep::assemble::{self, BuildOptions};
use siteprep::config::{self, ConfigError};
use siteprep::output;
use siteprep::workshops::Workshop;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

fn version_string() -> &'static str {
    let hash = env!("SITEPREP_GIT_HASH");
    if hash.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        // Called once for clap; the leak is bounded
        Box::leak(format!("{} ({hash})", env!("CARGO_PKG_VERSION")).into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "siteprep")]
#[command(about = "Assemble _config.yml for the site from caches, config and blog posts")]
#[command(long_about = "\
Assemble _config.yml for the site from caches, config and blog posts

Site structure:

  site/
  ├── _workshop_cache.yml          # From `make cache` (required)
  ├── _dashboard_cache.yml         # From `make cache` (required)
  ├── config/
  │   ├── standard.yml             # Base document; sets recent_length, upcoming_length
  │   ├── badges.yml
  │   ├── airports.yml
  │   └── flags.yml
  ├── _includes/
  │   ├── people/*.html            # Listed under `people`
  │   └── projects/*.html          # Listed under `projects`
  └── blog/2020/01/*.html          # Posts with `---` front-matter

Outputs: _config.yml (in --output) and _includes/recent_blog_posts.html.")]
#[command(version = version_string())]
struct Cli {
    /// Site root containing the caches, _includes/ and blog/
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Configuration directory (relative to the site root)
    #[arg(short = 'c', long = "config-dir", default_value = "config", global = true)]
    config_dir: PathBuf,

    /// Output directory for _config.yml (relative to the site root; default: the root)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Site identifier recorded in the document
    #[arg(short, long, default_value = "local", global = true)]
    site: String,

    /// Build date (YYYY-MM-DD) used to select upcoming workshops; default: today
    #[arg(short, long, global = true)]
    today: Option<NaiveDate>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Assemble and write _config.yml and the recent-posts include
    Build,
    /// Run the whole pipeline without writing anything
    Check,
    /// Print `slug url` for each workshop
    ListUrls {
        /// YAML list of workshops, or `-` for stdin (default: `workshops` in the generated _config.yml)
        input: Option<PathBuf>,
    },
}

/// The part of a generated `_config.yml` that `list-urls` reads.
#[derive(Deserialize)]
struct GeneratedConfig {
    #[serde(default)]
    workshops: Vec<Workshop>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let opts = build_options(&cli);

    match cli.command {
        Command::Build => {
            println!("==> Building {}", opts.root.display());
            let (assembled, written) = assemble::build(&opts)?;
            output::print_summary(&assembled.summary);
            output::print_written(&written);
            println!("==> Build complete");
        }
        Command::Check => {
            println!("==> Checking {}", opts.root.display());
            let assembled = assemble::assemble(&opts)?;
            output::print_summary(&assembled.summary);
            println!("==> Site data is valid");
        }
        Command::ListUrls { input } => {
            let workshops = read_workshops(input.as_deref(), &opts.output_dir)?;
            output::print_workshop_urls(&workshops);
        }
    }

    Ok(())
}

/// Resolve command-line paths against the site root.
fn build_options(cli: &Cli) -> BuildOptions {
    let root = cli.root.clone();
    let output_dir = match &cli.output {
        Some(dir) => root.join(dir),
        None => root.clone(),
    };
    BuildOptions {
        config_dir: root.join(&cli.config_dir),
        output_dir,
        root,
        site: cli.site.clone(),
        today: cli.today.unwrap_or_else(|| Local::now().date_naive()),
        timestamp: Utc::now(),
    }
}

fn read_workshops(
    input: Option<&Path>,
    output_dir: &Path,
) -> Result<Vec<Workshop>, Box<dyn std::error::Error>> {
    match input {
        Some(path) if path == Path::new("-") => {
            Ok(serde_yaml::from_reader(std::io::stdin().lock())?)
        }
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let workshops = serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(workshops)
        }
        None => {
            let generated: GeneratedConfig = config::load_info(output_dir, None)?;
            Ok(generated.workshops)
        }
    }
}

/// Install a stderr subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
