#![deny(warnings)]

//! Headless CLI: plays a short scripted opening, runs generation ticks and
//! prints a KPI line.

use anyhow::{Context, Result};
use sim_core::{CrewRole, EconomyConfig, GameState, ResourceKind, TradeSide};
use sim_econ::Action;
use sim_runtime::{spawn_session, AutosaveSink, GameStore, SessionError, SessionHandle};
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Args {
    seed: Option<u64>,
    ticks: u32,
    config: Option<PathBuf>,
    save: Option<PathBuf>,
    load: Option<PathBuf>,
}

fn parse_args() -> Args {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--seed" => args.seed = it.next().and_then(|s| s.parse().ok()),
            "--ticks" => args.ticks = it.next().and_then(|s| s.parse().ok()).unwrap_or(0),
            "--config" => args.config = it.next().map(PathBuf::from),
            "--save" => args.save = it.next().map(PathBuf::from),
            "--load" => args.load = it.next().map(PathBuf::from),
            _ => {}
        }
    }
    args
}

fn load_config(args: &Args) -> Result<EconomyConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            EconomyConfig::from_yaml_str(&text)?
        }
        None => EconomyConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.rng_seed = seed;
    }
    Ok(cfg)
}

/// The opening every scripted run plays. Rejections are logged, not fatal.
fn opening(state: &GameState) -> Vec<Action> {
    let mut script = vec![Action::TrainCrew, Action::BoostMorale];
    if let Some(target) = state.systems.iter().find(|s| !s.is_explored()) {
        script.push(Action::SelectSystem(target.name.clone()));
        script.push(Action::ExploreSystem);
        script.push(Action::EstablishColony);
    }
    script.push(Action::Trade {
        resource: ResourceKind::Food,
        side: TradeSide::Buy,
    });
    if let Some(heir) = state
        .crew
        .iter()
        .filter(|c| c.role != CrewRole::Captain)
        .min_by_key(|c| c.age)
    {
        script.push(Action::SelectHeir(heir.id.clone()));
    }
    script.push(Action::RecruitCrew);
    script
}

async fn play(handle: &SessionHandle, ticks: u32) -> Result<()> {
    let start = handle.snapshot().await?;
    for action in opening(&start) {
        let label = action.label();
        match handle.act(action).await {
            Ok(message) => info!(action = label, "{message}"),
            Err(SessionError::Transaction(err)) => warn!(action = label, "{err}"),
            Err(err) => return Err(err.into()),
        }
    }
    for _ in 0..ticks {
        handle.tick().await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .init();

    let args = parse_args();
    info!(?args, git = env!("GIT_SHA"), "starting CLI");

    let cfg = load_config(&args)?;
    let mut store = GameStore::new(cfg.clone())?;
    if let Some(path) = &args.load {
        let state = persistence::load_from_path(path, &cfg.bounds)?;
        store.restore(state)?;
    }
    if let Some(path) = &args.save {
        store.add_sink(Box::new(AutosaveSink::new(path.clone(), 50)));
    }

    let (handle, join) = spawn_session(store);
    play(&handle, args.ticks).await?;
    handle.shutdown().await?;
    let store = join.await.context("session task failed")?;

    let snap = store.snapshot();
    if let Some(path) = &args.save {
        persistence::save_to_path(path, &snap)?;
        info!(path = %path.display(), "game saved");
    }

    let r = &snap.resources;
    let explored = snap.systems.iter().filter(|s| s.is_explored()).count();
    let colonies: usize = snap
        .systems
        .iter()
        .map(|s| s.planets.iter().filter(|p| p.developed).count())
        .sum();
    let heir = snap.heir().map(|c| c.name.as_str()).unwrap_or("none");
    println!(
        "KPI | ticks: {} | credits: {} | energy: {} | minerals: {} | food: {} | influence: {} | crew: {} | explored: {} | colonies: {} | heir: {}",
        snap.ticks,
        r.credits,
        r.energy,
        r.minerals,
        r.food,
        r.influence,
        snap.crew.len(),
        explored,
        colonies,
        heir
    );

    Ok(())
}
