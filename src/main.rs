//! Hearth - command-line driver for the battle engine
//!
//! Plays single matches (human, scripted, or bot controllers), runs
//! parallel tournaments, and runs tight loops for profiling.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use hearth_engine::{
    core::{HeroClass, PlayerHandle},
    game::{
        ControllerChannel, GameLogger, GameLoop, InteractiveController, OutputFormat, PlayerController,
        RandomController, ScriptedController, VerbosityLevel, ZeroController,
    },
    loader::{deck_paths_in, load_catalog_dir, load_deck, load_decks, DeckList, GameInitializer},
    tournament::{play_match, run_tourney, ControllerType, MatchSetup, TournamentConfig},
};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Controller type for each seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ControllerArg {
    /// Always chooses the first legal action (for testing)
    Zero,
    /// Chooses uniformly among legal actions
    Random,
    /// Text UI controller for human play via stdin
    Tui,
    /// Plays a fixed command script (requires --p1-script / --p2-script)
    Script,
}

impl ControllerArg {
    /// Bot equivalent, for modes that cannot prompt
    fn automated(self) -> anyhow::Result<ControllerType> {
        match self {
            ControllerArg::Zero => Ok(ControllerType::Zero),
            ControllerArg::Random => Ok(ControllerType::Random),
            other => bail!("controller '{other:?}' cannot be used in tournament mode"),
        }
    }
}

/// Verbosity level for game output (custom parser supporting both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

impl From<VerbosityArg> for VerbosityLevel {
    fn from(arg: VerbosityArg) -> Self {
        arg.0
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Parser)]
#[command(name = "hearth")]
#[command(about = "Hearth - two-player card battle engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one match
    Play {
        /// Deck file (.dck) for player 1 (built-in class deck if omitted)
        #[arg(value_name = "PLAYER1_DECK", requires = "deck2")]
        deck1: Option<PathBuf>,

        /// Deck file (.dck) for player 2
        #[arg(value_name = "PLAYER2_DECK")]
        deck2: Option<PathBuf>,

        /// Player 1 controller type
        #[arg(long, value_enum, default_value = "random")]
        p1: ControllerArg,

        /// Player 2 controller type
        #[arg(long, value_enum, default_value = "random")]
        p2: ControllerArg,

        /// Command script for player 1, e.g. "play 1 0; attack 1 -0; end"
        #[arg(long, value_name = "COMMANDS")]
        p1_script: Option<String>,

        /// Command script for player 2
        #[arg(long, value_name = "COMMANDS")]
        p2_script: Option<String>,

        /// Hero class for player 1 (overrides the deck's Hero=)
        #[arg(long)]
        p1_hero: Option<HeroClass>,

        /// Hero class for player 2 (overrides the deck's Hero=)
        #[arg(long)]
        p2_hero: Option<HeroClass>,

        /// Set random seed for deterministic play
        #[arg(long)]
        seed: Option<u64>,

        /// Verbosity level for game output (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, default_value = "normal", short = 'v')]
        verbosity: VerbosityArg,

        /// Log line format
        #[arg(long, value_enum, default_value = "text")]
        output_format: FormatArg,

        /// Turn limit before the match is called a draw
        #[arg(long, default_value_t = 200)]
        max_turns: u32,

        /// Refused actions tolerated before the match is aborted
        #[arg(long, default_value_t = 64)]
        max_rejections: u32,

        /// Directory of JSON card catalog files, added to the built-in set
        #[arg(long, value_name = "DIR")]
        cards: Option<PathBuf>,

        /// Print a state hash before each action request
        #[arg(long)]
        debug_state_hash: bool,
    },

    /// Run many automated matches in parallel and report win rates
    Tourney {
        /// Deck files (.dck), or directories of them
        #[arg(value_name = "DECKS", required = true)]
        decks: Vec<PathBuf>,

        /// Number of games to run
        #[arg(long, short = 'g')]
        games: Option<usize>,

        /// Run for this many seconds instead of a fixed count
        #[arg(long, conflicts_with = "games")]
        seconds: Option<u64>,

        #[arg(long, value_enum, default_value = "random")]
        p1: ControllerArg,

        #[arg(long, value_enum, default_value = "random")]
        p2: ControllerArg,

        /// Tournament seed (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long, default_value_t = 200)]
        max_turns: u32,

        #[arg(long, value_name = "DIR")]
        cards: Option<PathBuf>,
    },

    /// Run games for profiling (use with cargo-flamegraph)
    Profile {
        /// Number of games to run
        #[arg(long, short = 'g', default_value_t = 1000)]
        games: usize,

        /// Random seed for deterministic profiling
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Deck file to use for both players (built-in decks if omitted)
        #[arg(long, short = 'd')]
        deck: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            deck1,
            deck2,
            p1,
            p2,
            p1_script,
            p2_script,
            p1_hero,
            p2_hero,
            seed,
            verbosity,
            output_format,
            max_turns,
            max_rejections,
            cards,
            debug_state_hash,
        } => {
            let initializer = initializer_with_cards(cards.as_deref()).await?;
            let decks = match (deck1, deck2) {
                (Some(d1), Some(d2)) => Some((read_deck(&d1).await?, read_deck(&d2).await?)),
                _ => None,
            };
            let options = PlayOptions {
                p1,
                p2,
                p1_script,
                p2_script,
                p1_hero,
                p2_hero,
                seed,
                verbosity: verbosity.into(),
                output_format: output_format.into(),
                max_turns,
                max_rejections,
                debug_state_hash,
            };
            run_play(&initializer, decks, options)?
        }
        Commands::Tourney {
            decks,
            games,
            seconds,
            p1,
            p2,
            seed,
            max_turns,
            cards,
        } => {
            let initializer = initializer_with_cards(cards.as_deref()).await?;
            let config = TournamentConfig {
                games,
                seconds,
                p1: p1.automated()?,
                p2: p2.automated()?,
                seed: seed.unwrap_or_else(rand::random),
                max_turns,
            };
            run_tourney_mode(&initializer, decks, config).await?
        }
        Commands::Profile { games, seed, deck } => {
            let deck = match deck {
                Some(path) => Some(read_deck(&path).await?),
                None => None,
            };
            run_profile(games, seed, deck)?
        }
    }

    Ok(())
}

async fn initializer_with_cards(cards: Option<&Path>) -> anyhow::Result<GameInitializer> {
    let mut initializer = GameInitializer::new();
    if let Some(dir) = cards {
        let (count, duration) = load_catalog_dir(initializer.database_mut(), dir)
            .await
            .with_context(|| format!("loading card catalog from {}", dir.display()))?;
        println!("Loaded {count} catalog cards");
        eprintln!("  (Loading time: {:.2}ms)", duration.as_secs_f64() * 1000.0);
    }
    Ok(initializer)
}

async fn read_deck(path: &Path) -> anyhow::Result<DeckList> {
    load_deck(path)
        .await
        .with_context(|| format!("reading deck {}", path.display()))
}

struct PlayOptions {
    p1: ControllerArg,
    p2: ControllerArg,
    p1_script: Option<String>,
    p2_script: Option<String>,
    p1_hero: Option<HeroClass>,
    p2_hero: Option<HeroClass>,
    seed: Option<u64>,
    verbosity: VerbosityLevel,
    output_format: OutputFormat,
    max_turns: u32,
    max_rejections: u32,
    debug_state_hash: bool,
}

fn build_controller(
    kind: ControllerArg,
    player: PlayerHandle,
    script: Option<&str>,
    seed: Option<u64>,
    flag: &str,
) -> anyhow::Result<Box<dyn PlayerController>> {
    Ok(match kind {
        ControllerArg::Zero => Box::new(ZeroController::new(player)),
        ControllerArg::Random => match seed {
            Some(seed) => Box::new(RandomController::with_seed(player, seed)),
            None => Box::new(RandomController::new(player)),
        },
        ControllerArg::Tui => Box::new(InteractiveController::new(player)),
        ControllerArg::Script => {
            let Some(script) = script else {
                bail!("--{flag} is required for a scripted controller");
            };
            Box::new(ScriptedController::from_script(player, script).with_context(|| format!("parsing --{flag}"))?)
        }
    })
}

fn run_play(
    initializer: &GameInitializer,
    decks: Option<(DeckList, DeckList)>,
    options: PlayOptions,
) -> anyhow::Result<()> {
    let mut game = match decks {
        Some((mut first, mut second)) => {
            if let Some(hero) = options.p1_hero {
                first.hero = Some(hero);
            }
            if let Some(hero) = options.p2_hero {
                second.hero = Some(hero);
            }
            initializer.deck_match(&first, &second)?
        }
        None => initializer.builtin_match(
            options.p1_hero.unwrap_or(HeroClass::Mage),
            options.p2_hero.unwrap_or(HeroClass::Warrior),
        )?,
    };

    let [h1, h2] = game.player_handles();
    let c1 = build_controller(
        options.p1,
        h1,
        options.p1_script.as_deref(),
        options.seed.map(|s| s.wrapping_add(1)),
        "p1-script",
    )?;
    let c2 = build_controller(
        options.p2,
        h2,
        options.p2_script.as_deref(),
        options.seed.map(|s| s.wrapping_add(2)),
        "p2-script",
    )?;

    let mut logger = GameLogger::with_verbosity(options.verbosity);
    logger.set_output_format(options.output_format);
    logger.set_debug_state_hash(options.debug_state_hash);
    let mut channel = ControllerChannel::new(c1, c2).with_logger(logger);
    if let Some(seed) = options.seed {
        channel = channel.with_seed(seed);
    }

    if options.verbosity >= VerbosityLevel::Minimal && options.output_format == OutputFormat::Text {
        for handle in [h1, h2] {
            let player = game.player(handle)?;
            println!("{handle}: {} ({}, {} cards)", player.name, player.hero.class, player.deck.len());
        }
        println!("=== Starting Game ===\n");
    }

    let result = GameLoop::new(&mut game)
        .with_max_turns(options.max_turns)
        .with_max_rejections(options.max_rejections)
        .run_game(&mut channel)?;

    if options.verbosity >= VerbosityLevel::Minimal && options.output_format == OutputFormat::Text {
        println!("\n=== Game Over ===");
        println!("{result}");
        for handle in [h1, h2] {
            let player = game.player(handle)?;
            println!(
                "  {}: {} health, {} armor, {} minions",
                player.name,
                player.hero.health,
                player.hero.armor,
                player.minions.len()
            );
        }
    }
    Ok(())
}

async fn run_tourney_mode(
    initializer: &GameInitializer,
    inputs: Vec<PathBuf>,
    config: TournamentConfig,
) -> anyhow::Result<()> {
    println!("=== Hearth - Tournament Mode ===\n");

    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            paths.extend(deck_paths_in(&input).await.with_context(|| format!("listing {}", input.display()))?);
        } else {
            paths.push(input);
        }
    }

    println!("Loading decks...");
    let lists = load_decks(&paths).await.context("loading tournament decks")?;
    let mut decks = Vec::with_capacity(lists.len());
    for (path, deck) in paths.iter().zip(lists) {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| deck.display_name());
        println!("  {name}: {} cards", deck.total_cards());
        decks.push((name, deck));
    }
    println!("\nUsing tournament seed: {}", config.seed);
    println!("Controllers: P1={:?}, P2={:?}\n", config.p1, config.p2);

    let start = Instant::now();
    let stats = run_tourney(initializer, &decks, &config)?;
    let elapsed = start.elapsed();

    println!("=== Tournament Complete ===");
    println!("Total games played: {}", stats.games());
    println!("Elapsed time: {:.2}s", elapsed.as_secs_f64());
    println!("Games per second: {:.2}\n", stats.games() as f64 / elapsed.as_secs_f64().max(f64::EPSILON));
    stats.print_report();
    Ok(())
}

/// Run profiling games
fn run_profile(iterations: usize, seed: u64, deck: Option<DeckList>) -> anyhow::Result<()> {
    println!("=== Hearth - Profiling Mode ===\n");
    println!("Running {iterations} games with seed {seed}\n");

    let initializer = GameInitializer::new();
    let start = Instant::now();
    let mut turns = 0u64;
    for i in 0..iterations {
        let mut game = match &deck {
            Some(deck) => initializer.deck_match(deck, deck)?,
            None => initializer.builtin_match(HeroClass::ALL[i % 6], HeroClass::ALL[(i / 6) % 6])?,
        };
        let setup = MatchSetup::new(ControllerType::Random, ControllerType::Random, seed.wrapping_add(i as u64));
        turns += u64::from(play_match(&mut game, &setup)?.turns_played);

        if (i + 1) % 100 == 0 {
            println!("Completed {} games", i + 1);
        }
    }
    let elapsed = start.elapsed().as_secs_f64().max(f64::EPSILON);

    println!();
    println!("Profiling complete! {iterations} games executed.");
    println!("  {:.1} games/sec, {:.1} turns/sec", iterations as f64 / elapsed, turns as f64 / elapsed);
    println!();
    println!("For CPU profiling:");
    println!("  cargo flamegraph --bin hearth -- profile --games {iterations} --seed {seed}");

    Ok(())
}
