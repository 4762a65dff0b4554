use anyhow::Result;
use aviary_core::CancelToken;
use aviary_lib::config::AppConfig;
use aviary_lib::runner::run_evolution;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Override the generation budget
    #[arg(short, long)]
    generations: Option<u32>,

    /// Override the population size
    #[arg(short, long)]
    population: Option<usize>,

    /// Override the RNG seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Hold each episode to the configured tick rate instead of running
    /// flat out
    #[arg(long)]
    paced: bool,

    /// Write the champion controller to this JSON file
    #[arg(long)]
    champion: Option<String>,
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let mut config = match std::fs::read_to_string(&args.config) {
        Ok(content) => AppConfig::from_toml(&content)?,
        Err(_) => {
            tracing::warn!(path = %args.config, "config file not found, using defaults");
            AppConfig::default()
        }
    };
    if let Some(generations) = args.generations {
        config.max_generations = generations;
    }
    if let Some(population) = args.population {
        config.evolution.population_size = population;
    }
    if let Some(seed) = args.seed {
        config.sim.seed = Some(seed);
    }
    config.validate()?;

    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("cancellation requested, stopping before the next tick");
                cancel.cancel();
            }
        });
    }

    let paced = args.paced;
    let worker_cancel = cancel.clone();
    let outcome =
        tokio::task::spawn_blocking(move || run_evolution(&config, &worker_cancel, paced))
            .await??;

    tracing::info!(
        generations = outcome.generations_run,
        best_fitness = outcome.best_fitness,
        best_score = outcome.best_score,
        cancelled = outcome.cancelled,
        "evolution finished"
    );

    if let Some(path) = args.champion {
        let json = serde_json::to_string_pretty(&outcome.champion)?;
        std::fs::write(&path, json)?;
        tracing::info!(path = %path, "champion controller saved");
    }

    Ok(())
}
