use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::fs;
use std::path::{Path, PathBuf};

use criteria_rs::criteria::{parse, Criterion};
use criteria_rs::model::Build;
use criteria_rs::saved::{ConfigLoader, EngineConfig};
use criteria_rs::store::{MemoryStore, SqlStatement};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Engine configuration (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a query and print its canonical text
    Render {
        /// The query text
        query: String,
    },
    /// Check whether a build matches a query
    Match {
        query: String,

        /// Build as a JSON file
        #[arg(short, long)]
        build: PathBuf,
    },
    /// Compile a query into a SQL condition
    Compile { query: String },
    /// Select builds from a JSON array through the compiled predicate
    Select {
        query: String,

        /// Builds as a JSON array file
        #[arg(short, long)]
        builds: PathBuf,
    },
    /// Rewrite saved queries after a project moved
    MoveProject {
        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,
    },
    /// List saved queries referencing a project
    Usage {
        /// Project path
        project: String,
    },
    /// Print the notifications a new build triggers
    Notify {
        /// Build as a JSON file
        #[arg(short, long)]
        build: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => ConfigLoader::new()
            .load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(EngineConfig::default().with_env_overrides()),
    }
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    let ctx = config.context()?;

    match args.command {
        Commands::Render { query } => {
            println!("{}", parse(&query)?);
        }
        Commands::Match { query, build } => {
            let criteria = parse(&query)?;
            let build = Build::from_json(&read_file(&build)?)?;
            println!("{}", criteria.matches(&build, &ctx));
        }
        Commands::Compile { query } => {
            let predicate = parse(&query)?.compile(&ctx)?;
            println!("{}", SqlStatement::from_predicate(&predicate));
        }
        Commands::Select { query, builds } => {
            let criteria = parse(&query)?;
            let builds = Build::list_from_json(&read_file(&builds)?)?;
            let predicate = criteria.compile(&ctx)?;
            let store = MemoryStore::from_entities(&builds, &ctx.schema);

            let selected = store.select(&predicate);
            for &i in &selected {
                let build = &builds[i];
                if !criteria.matches(build, &ctx) {
                    log::warn!(
                        "Build {} #{} selected by the store but not matched in memory",
                        build.project,
                        build.number
                    );
                }
                println!("{}", serde_json::to_string(build)?);
            }
            log::info!("Selected {} of {} builds", selected.len(), builds.len());
        }
        Commands::MoveProject { from, to } => {
            let registry = config.registry().await?;
            let changed = registry.on_move_project(&from, &to).await;
            for name in registry.names().await {
                if let Some(saved) = registry.get(&name).await {
                    println!("{}: {}", saved.name, saved.query());
                }
            }
            log::info!("{} saved queries rewritten", changed);
        }
        Commands::Usage { project } => {
            let registry = config.registry().await?;
            let names = registry.is_using_project(&project).await;
            if names.is_empty() {
                log::info!("No saved query references '{}'", project);
            }
            for name in names {
                println!("{}", name);
            }
        }
        Commands::Notify { build } => {
            let registry = config.registry().await?;
            let build = Build::from_json(&read_file(&build)?)?;
            for n in registry.notifications(&build, &ctx).await {
                println!("{} -> {}", n.query, n.subscriber);
            }
        }
    }

    Ok(())
}
