use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use packagist_meta::config::{self, Config};
use packagist_meta::schema::{RegistryMeta, parse_packages_responses};
use packagist_meta::version::registries::PackagistRegistry;
use packagist_meta::version::registry::Registry;

#[derive(Parser)]
#[command(name = "packagist-meta")]
#[command(version, about = "Decode Composer registry metadata into release lists")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Merge the releases of a package from local metadata files
    Releases {
        /// Composer package name (vendor/name)
        package: String,
        /// Metadata documents, merged in the given order
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Fetch the releases of a package from a Composer repository
    Fetch {
        /// Composer package name (vendor/name)
        package: String,
        /// JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Show the normalized registry root of a local packages.json
    Meta { file: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging()?;

    match cli.command {
        Command::Releases { package, files } => {
            let documents = files
                .iter()
                .map(|path| read_json(path))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let result = parse_packages_responses(&package, &documents)
                .ok_or_else(|| anyhow!("No valid release metadata for {}", package))?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Fetch { package, config } => {
            let config = match config {
                Some(path) => Config::load(&path)?,
                None => Config::default(),
            };
            let registry = PackagistRegistry::new(&config.registry.url)
                .with_dev(config.registry.include_dev);
            let result = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?
                .block_on(registry.fetch_releases(&package))?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Meta { file } => {
            let meta = RegistryMeta::parse(&read_json(&file)?);
            println!("{}", serde_json::to_string_pretty(&meta)?);
        }
    }

    Ok(())
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn init_logging() -> anyhow::Result<WorkerGuard> {
    let log_path = config::log_path();
    let log_dir = log_path.parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create {}", log_dir.display()))?;

    let file_name = log_path.file_name().unwrap_or(OsStr::new("packagist-meta.log"));
    let appender = tracing_appender::rolling::never(log_dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let env_filter =
        EnvFilter::try_from_env(config::LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}
