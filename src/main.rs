use circlegen::{config, generate, output, scan, skip};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "circlegen")]
#[command(about = "CircleCI config generator for a Docker image monorepo")]
#[command(long_about = "\
CircleCI config generator for a Docker image monorepo

The directory tree is the data source. Every subdirectory of the image
roots is a published tag, and the generated circle.yml carries one
build-and-test job per tag.

Repository structure:

  .
  ├── circlegen.toml           # Generator config (optional, stock defaults apply)
  ├── circle.yml               # Generated output, do not edit by hand
  ├── base/
  │   ├── 10.0.0/              # Plain version tag → job with Node version check
  │   ├── 12.0.0-libgbm/       # Named variant → listed under [unversioned]
  │   └── 6/                   # Retired tag → listed under [skip]
  ├── browsers/
  │   └── node12.4.0-chrome76/ # Components name the bundled browsers
  └── included/
      └── 7.52.0/              # Kept when >= the [included] minimum

Browser detection (first marker per browser wins):
  Chrome:  chrome<N> component → \"Google Chrome N\"
  Firefox: ff<N> component     → \"Mozilla Firefox N\"
  Edge:    edge<N> component   → \"Microsoft Edge N\"

Run 'circlegen gen-config' to print a documented circlegen.toml.")]
#[command(version)]
struct Cli {
    /// Image repository root
    #[arg(long, default_value = ".", global = true)]
    repo: PathBuf,

    /// Config file (default: <repo>/circlegen.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the image directories and report discovered tags
    Scan {
        /// Print the manifest as JSON instead of the annotated report
        #[arg(long)]
        json: bool,
    },
    /// Render the CI config and write it to the output file
    Generate,
    /// Verify the committed CI config is up to date (no write)
    Check,
    /// Print a stock circlegen.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Scan { json } => {
            let config = resolve_config(&cli)?;
            let manifest = scan::scan(&cli.repo, &config.paths)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&manifest)?);
            } else {
                output::print_scan_report(&manifest, &config);
            }
        }
        Command::Generate => {
            let config = resolve_config(&cli)?;

            println!("==> Scanning {}", cli.repo.display());
            let manifest = scan::scan(&cli.repo, &config.paths)?;
            output::print_scan_report(&manifest, &config);

            println!("==> Rendering {}", config.paths.output);
            let partitions = skip::partition_manifest(&manifest, &config)?;
            let document = generate::render_partitions(&partitions, &config)?;

            let out_path = cli.repo.join(&config.paths.output);
            generate::write_document(&out_path, &document)?;
            output::print_generate_summary(&partitions, &config.paths.output);
        }
        Command::Check => {
            let config = resolve_config(&cli)?;

            println!("==> Checking {}", config.paths.output);
            let manifest = scan::scan(&cli.repo, &config.paths)?;
            let document = generate::render_document(&manifest, &config)?;

            let out_path = cli.repo.join(&config.paths.output);
            match std::fs::read_to_string(&out_path) {
                Ok(committed) if committed == document => {
                    println!("==> {}", output::format_check_success(&config.paths.output));
                }
                Ok(_) => {
                    return Err(output::format_check_failure(&config.paths.output, true).into());
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Err(output::format_check_failure(&config.paths.output, false).into());
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the generator config: an explicit --config file must exist, the
/// default <repo>/circlegen.toml may be absent.
fn resolve_config(cli: &Cli) -> Result<config::GeneratorConfig, config::ConfigError> {
    match &cli.config {
        Some(path) => config::load_config_file(path),
        None => config::load_config(&cli.repo),
    }
}
