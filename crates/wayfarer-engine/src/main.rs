//! Operator binary for the Wayfarer game engine.
//!
//! Prepares the database a front end will use. The first argument picks the
//! command:
//!
//! - `migrate` -- apply schema migrations
//! - `seed` -- migrate, then generate and insert the world if none exists
//! - `check` (default) -- migrate and report catalog row counts
//!
//! Configuration is read from `wayfarer-config.yaml` in the working
//! directory; `DATABASE_URL` overrides the connection URL and `RUST_LOG`
//! overrides the log filter.

use std::path::Path;

use anyhow::{Context, bail};
use tracing::info;
use tracing_subscriber::EnvFilter;
use wayfarer_core::GameConfig;
use wayfarer_engine::Game;

const CONFIG_PATH: &str = "wayfarer-config.yaml";

/// What the operator asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Migrate,
    Seed,
    Check,
}

impl Command {
    fn parse(arg: Option<&str>) -> anyhow::Result<Self> {
        match arg {
            Some("migrate") => Ok(Self::Migrate),
            Some("seed") => Ok(Self::Seed),
            Some("check") | None => Ok(Self::Check),
            Some(other) => bail!("unknown command `{other}`, expected migrate, seed or check"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let command = Command::parse(args.get(1).map(String::as_str))?;

    let loaded = load_config()?;
    let from_file = loaded.is_some();
    let config = loaded.unwrap_or_else(|| {
        let mut config = GameConfig::default();
        config.database.apply_env_overrides();
        config
    });

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(command = ?command, "wayfarer-engine starting");
    if !from_file {
        info!("Config file not found, using defaults");
    }

    let game = Game::connect(config)
        .await
        .context("failed to connect to PostgreSQL")?;
    game.migrate().await.context("failed to run migrations")?;
    info!("Migrations applied");

    match command {
        Command::Migrate => {}
        Command::Seed => match game.seed_world().await? {
            Some(counts) => info!(
                locations = counts.locations,
                items = counts.items,
                paths = counts.paths,
                "World seeded"
            ),
            None => info!("World already present, nothing to seed"),
        },
        Command::Check => {
            let counts = game.world_counts().await?;
            info!(
                locations = counts.locations,
                items = counts.items,
                mobs = counts.mobs,
                listings = counts.listings,
                paths = counts.paths,
                seeded = counts.is_seeded(),
                "World catalog"
            );
        }
    }

    game.db().close().await;
    info!("wayfarer-engine finished");
    Ok(())
}

/// Load `wayfarer-config.yaml`, or `None` if there is no such file.
fn load_config() -> anyhow::Result<Option<GameConfig>> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        let config = GameConfig::from_file(config_path)
            .with_context(|| format!("failed to load {CONFIG_PATH}"))?;
        Ok(Some(config))
    } else {
        Ok(None)
    }
}
