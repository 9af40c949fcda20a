use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;

use echo_registry::config::{ResolverConfig, data_dir, db_path, log_path};
use echo_registry::logging::{self, LogFormat};
use echo_registry::resolve::VersionResolver;
use echo_registry::version::cache::Cache;

#[derive(Parser)]
#[command(name = "echo-registry")]
#[command(
    version,
    about = "Latest compatible loader, toolchain and mod versions for Minecraft releases"
)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Skip the on-disk cache
    #[arg(long, global = true)]
    no_cache: bool,

    /// Write logs to a file instead of stderr (default location when no path is given)
    #[arg(long, global = true, num_args = 0..=1, default_missing_value = "")]
    log_file: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve one component
    Resolve { component: String, release: String },
    /// Resolve every built-in component plus extra projects
    All {
        release: String,
        #[arg(long = "project")]
        projects: Vec<String>,
    },
    /// Per-loader versions for components across releases
    Matrix {
        #[arg(long = "component", required = true)]
        components: Vec<String>,
        #[arg(long = "release", required = true)]
        releases: Vec<String>,
    },
    /// Whether a component can exist for a release, without network access
    Check { component: String, release: String },
    /// List Minecraft releases
    Releases,
    /// Report project names unknown to Modrinth
    Validate {
        release: String,
        #[arg(required = true)]
        projects: Vec<String>,
    },
    /// Inspect or clean the on-disk cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Delete expired entries
    Purge,
    /// Entry counts
    Stats,
    /// Verify the database answers queries
    Health,
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_cache(action: CacheAction) -> anyhow::Result<()> {
    std::fs::create_dir_all(data_dir())?;
    let cache = Cache::new(&db_path())?;

    match action {
        CacheAction::Purge => print_json(&json!({ "removed": cache.purge_expired()? })),
        CacheAction::Stats => print_json(&cache.stats()?),
        CacheAction::Health => {
            cache.check_health()?;
            print_json(&json!({ "healthy": true, "path": db_path() }))
        }
    }
}

async fn run(command: Command, config: ResolverConfig) -> anyhow::Result<()> {
    let resolver = VersionResolver::from_config(&config)?;

    match command {
        Command::Resolve { component, release } => {
            print_json(&resolver.resolve_one(&component, &release).await)
        }
        Command::All { release, projects } => {
            print_json(&resolver.resolve_all(&release, &projects).await)
        }
        Command::Matrix {
            components,
            releases,
        } => print_json(&resolver.build_matrix(&components, &releases).await),
        Command::Check { component, release } => {
            let compatible = resolver.is_compatible(&component, &release);
            print_json(&json!({
                "component": component,
                "release": release,
                "compatible": compatible,
            }))
        }
        Command::Releases => print_json(&resolver.releases().await?),
        Command::Validate { release, projects } => {
            let invalid = resolver.find_invalid_projects(&projects, &release).await?;
            print_json(&json!({ "invalid": invalid }))
        }
        Command::Cache { action } => run_cache(action),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_file = cli.log_file.map(|path| {
        if path.as_os_str().is_empty() {
            log_path()
        } else {
            path
        }
    });
    let _guard = logging::init(cli.log_format, log_file.as_deref())?;

    let mut config = ResolverConfig::load(cli.config.as_deref())?;
    if cli.no_cache {
        config.cache.enabled = false;
    }

    match cli.command {
        Command::Cache { action } => run_cache(action),
        command => tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?
            .block_on(run(command, config)),
    }
}
