use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use game_core::{Config, Game, HumanController, NetworkController, Params};
use neat::{Checkpointer, FeedForward, NeatConfig, Population, StatisticsReporter, StdOutReporter};
use std::{
    cell::RefCell,
    path::{Path, PathBuf},
    rc::Rc,
};
use trainer::{
    evaluate_population, persist_best, play, restore_best, LineKeys, LogRenderer, MatchSettings,
    Pacer,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Evolve Pong players by round-robin self-play")]
    Train {
        /// NEAT settings (JSON)
        #[arg(long, default_value = "neat.json")]
        config: PathBuf,
        /// Stop after this many generations, or earlier at the fitness threshold
        #[arg(long, default_value_t = 200)]
        generations: usize,
        /// Resume from a checkpoint instead of starting fresh
        #[arg(long)]
        restore: Option<PathBuf>,
        #[arg(long, default_value = "neat-checkpoint-")]
        checkpoint_prefix: PathBuf,
        #[arg(long, default_value_t = 1)]
        checkpoint_interval: usize,
        /// Where the winning genome is written
        #[arg(long, default_value = "best.genome")]
        best: PathBuf,
        #[arg(long, default_value_t = 12345)]
        seed: u64,
    },
    #[command(about = "Play against a trained genome: z up, s down, q quit, one key per line")]
    Play {
        #[arg(long, default_value = "neat.json")]
        config: PathBuf,
        #[arg(long, default_value = "best.genome")]
        best: PathBuf,
        #[arg(long, default_value_t = 12345)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Train {
            config,
            generations,
            restore,
            checkpoint_prefix,
            checkpoint_interval,
            best,
            seed,
        } => train(
            config,
            generations,
            restore,
            checkpoint_prefix,
            checkpoint_interval,
            best,
            seed,
        ),
        Command::Play { config, best, seed } => replay(config, best, seed),
    }
}

fn load_config(path: &Path) -> Result<NeatConfig> {
    NeatConfig::load(path).with_context(|| format!("loading NEAT config {}", path.display()))
}

fn train(
    config: PathBuf,
    generations: usize,
    restore: Option<PathBuf>,
    checkpoint_prefix: PathBuf,
    checkpoint_interval: usize,
    best: PathBuf,
    seed: u64,
) -> Result<()> {
    let mut population = match restore {
        Some(path) => {
            log::info!("restoring population from {}", path.display());
            log::info!("the checkpoint's own NEAT config is used, {} is ignored", config.display());
            Population::restore(&path)
                .with_context(|| format!("restoring checkpoint {}", path.display()))?
        }
        None => Population::new(load_config(&config)?, seed)?,
    };

    let stats = Rc::new(RefCell::new(StatisticsReporter::new()));
    population.add_reporter(StdOutReporter::new(true));
    population.add_reporter(stats.clone());
    population.add_reporter(Checkpointer::new(checkpoint_interval, checkpoint_prefix));

    let settings = MatchSettings {
        seed,
        ..Default::default()
    };
    let field = Config::new();
    let winner = population.run(
        |genomes, neat_config| evaluate_population(genomes, neat_config, &settings, &field),
        Some(generations),
    )?;

    log::info!(
        "best genome {} with fitness {:?}; mean fitness by generation {:?}",
        winner.id,
        winner.fitness,
        stats.borrow().mean_history()
    );
    persist_best(&winner, &best)
}

fn replay(config: PathBuf, best: PathBuf, seed: u64) -> Result<()> {
    let neat_config = load_config(&config)?;
    let genome = restore_best(&best)?;
    let net = FeedForward::create(&genome, &neat_config);
    log::info!(
        "playing genome {} ({} nodes): type z, s or nothing then enter to move, q to quit",
        genome.id,
        genome.nodes.len()
    );

    let mut game = Game::new(Config::new(), seed);
    let mut human = HumanController::new(LineKeys::stdin());
    let mut network = NetworkController::new(|input: &[f64]| net.activate(input));
    let mut pacer = Pacer::new(Params::TICKS_PER_SECOND);

    let info = play(
        &mut game,
        &mut human,
        &mut network,
        &mut LogRenderer::default(),
        Some(&mut pacer),
    );
    log::info!(
        "final score: you {} - {} network ({} ticks)",
        info.left_score,
        info.right_score,
        game.tick_count()
    );
    Ok(())
}
