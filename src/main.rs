use clap::{Parser, Subcommand};
use sitewright::generate::CancelToken;
use sitewright::imaging::SizeRequest;
use sitewright::resource::Resource;
use sitewright::site::Site;
use sitewright::{config, output};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "sitewright")]
#[command(about = "Static site resource pipeline")]
#[command(long_about = "\
Static site resource pipeline

Every file under the content directory becomes a resource. Plugins listed in
site.toml extend resources (thumbnails, digests) and hook into generation.
Output lands in the deploy directory at the same relative path.

Site structure:

  my-site/
  ├── site.toml                    # Optional config (see gen-config)
  ├── content/
  │   ├── index.md                 # Page: rendered to HTML
  │   ├── robots.txt               # Static: copied as-is
  │   └── media/images/hyde.jpg    # Media: plugins may attach capabilities
  └── deploy/                      # Generated

Run 'sitewright gen-config' to print a documented site.toml.")]
#[command(version)]
struct Cli {
    /// Site root containing site.toml and the content directory
    #[arg(long, default_value = ".", global = true)]
    site: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate every resource into the deploy directory
    Build {
        /// Regenerate even when outputs are up to date
        #[arg(long)]
        force: bool,
    },
    /// Generate a single resource
    Gen {
        /// Resource path, absolute or relative to the content directory
        path: PathBuf,
        /// Regenerate even when the output is up to date
        #[arg(long)]
        force: bool,
    },
    /// Write a thumbnail for one image (needs "thumbnails" in site.toml plugins)
    Thumb {
        /// Image path, absolute or relative to the content directory
        path: PathBuf,
        /// Target width in pixels
        #[arg(long)]
        width: Option<u32>,
        /// Target height in pixels
        #[arg(long)]
        height: Option<u32>,
    },
    /// Load config and list resources without generating anything
    Check,
    /// Print a stock site.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Build { force } => {
            let site = Site::open(&cli.site)?.force(force);
            println!(
                "==> Building {} → {}",
                site.context().content_root().display(),
                site.context().deploy_root().display()
            );
            let report = site.generator().generate_all(&CancelToken::new())?;
            output::print_build_report(&report);
            if !report.is_success() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Gen { path, force } => {
            let site = Site::open(&cli.site)?.force(force);
            let generated = site.generator().generate_resource_at(&path)?;
            println!("{}", output::format_generated(&generated));
        }
        Command::Thumb {
            path,
            width,
            height,
        } => {
            let site = Site::open(&cli.site)?;
            let derived = site.thumb(&path, &SizeRequest::new(width, height))?;
            println!("{}", output::format_derived(&derived));
        }
        Command::Check => {
            let site = Site::open(&cli.site)?;
            println!("==> Checking {}", site.context().content_root().display());
            let resources = site
                .registry()
                .all()
                .collect::<Result<Vec<Arc<Resource>>, _>>()?;
            output::print_check_output(&site.chain().names(), &resources);
            println!("==> Site is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Log to stderr so command output on stdout stays clean. `RUST_LOG`
/// overrides the level chosen by `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
