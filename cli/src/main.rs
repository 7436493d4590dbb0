//! # 2048 CLI
//!
//! Command-line interface for playing 2048 interactively or running
//! headless simulations with configurable policies. Best score and game
//! mode are kept in a small JSON file between runs.

mod render;
mod store;

use std::collections::BTreeMap;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use env_logger::Env;
use game_2048_core::{
    DebugTools, Direction, Game, GameEvent, GameMode, KeyValueStore, MemoryStore, SpawnRng,
};
use log::{info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::store::JsonFileStore;

#[derive(Parser, Debug)]
#[command(name = "game-2048")]
#[command(author, version, about = "Play 2048 in the terminal or run simulations")]
struct Args {
    /// Run in interactive mode (default if no other mode specified)
    #[arg(short, long)]
    interactive: bool,

    /// Number of episodes to run in headless mode
    #[arg(short, long)]
    episodes: Option<u32>,

    /// Random seed for deterministic runs
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Maximum steps per episode (0 = unlimited)
    #[arg(short, long, default_value = "10000")]
    max_steps: u32,

    /// Policy for headless mode
    #[arg(short, long, value_enum, default_value = "random")]
    policy: Policy,

    /// Show board after each move in headless mode
    #[arg(long)]
    verbose: bool,

    /// Target level to win at (2048, 4096, ..., 65536); saved for later runs
    #[arg(long)]
    mode: Option<GameMode>,

    /// File holding the best score and selected mode
    #[arg(long, value_name = "FILE", default_value = ".2048-store.json")]
    store: PathBuf,

    /// Enable the debug keys in interactive mode
    #[arg(long)]
    debug: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    /// Random valid moves
    Random,
    /// Cycle through actions: Left, Down, Right, Up
    Cycle,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    if args.interactive && args.episodes.is_some() {
        bail!("--interactive and --episodes are mutually exclusive");
    }

    let store = match JsonFileStore::open(&args.store) {
        Ok(store) => store,
        Err(err) => {
            warn!("ignoring unreadable store {}: {}", args.store.display(), err);
            JsonFileStore::empty(&args.store)
        }
    };

    let mut game = Game::with_store(store, args.seed);
    if let Some(mode) = args.mode {
        game.change_game_mode(mode);
    }

    match args.episodes {
        Some(episodes) => run_headless(&args, game.mode(), episodes),
        None => run_interactive(&args, game),
    }
    Ok(())
}

// =============================================================================
// Interactive mode
// =============================================================================

enum InputAction {
    Move(Direction),
    Continue,
    NextMode,
    Restart,
    Quit,
    Debug(DebugAction),
    None,
}

enum DebugAction {
    GameOver,
    Win,
    Fill,
    Add2048,
}

/// Run interactive mode where user plays with keyboard.
fn run_interactive<S: KeyValueStore>(args: &Args, mut game: Game<S, SmallRng>) {
    // Set terminal to raw mode for single-key input
    enable_raw_mode();

    let mut stdin = io::stdin();
    let mut buffer = [0u8; 3];
    let mut debug_rng = SmallRng::seed_from_u64(args.seed.wrapping_add(1));

    redraw(&game, args.debug, &[]);

    loop {
        let Some(bytes_read) = read_key(&mut stdin, &mut buffer) else {
            disable_raw_mode();
            println!("\nInput closed, exiting.");
            break;
        };

        let events = match parse_input(&buffer[..bytes_read], args.debug) {
            InputAction::Move(direction) => {
                let outcome = game.step(direction);
                if !outcome.moved {
                    continue;
                }
                outcome.events
            }
            InputAction::Continue => game.continue_game(),
            InputAction::NextMode => {
                let next = GameMode::all()
                    .find(|mode| *mode > game.mode())
                    .unwrap_or_default();
                game.change_game_mode(next);
                Vec::new()
            }
            InputAction::Restart => {
                game.restart();
                Vec::new()
            }
            InputAction::Quit => {
                disable_raw_mode();
                println!("\nGoodbye!");
                break;
            }
            InputAction::Debug(action) => {
                let level = game.target_level().unwrap_or(game.mode().level());
                let mut tools = DebugTools::new(&mut game);
                match action {
                    DebugAction::GameOver => tools.trigger_game_over(),
                    DebugAction::Win => tools.trigger_win(level),
                    DebugAction::Fill => {
                        tools.fill_board(&mut debug_rng);
                        Vec::new()
                    }
                    DebugAction::Add2048 => {
                        tools.add_tile(2048);
                        Vec::new()
                    }
                }
            }
            InputAction::None => continue,
        };

        redraw(&game, args.debug, &events);
    }
}

/// Read one keypress into `buffer`.
///
/// Returns `None` once input is closed or fails; interrupted reads are retried.
fn read_key<R: Read>(reader: &mut R, buffer: &mut [u8]) -> Option<usize> {
    loop {
        match reader.read(buffer) {
            Ok(0) => return None,
            Ok(n) => return Some(n),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => {
                warn!("failed to read input: {}", err);
                return None;
            }
        }
    }
}

fn redraw<S: KeyValueStore, R: SpawnRng>(game: &Game<S, R>, debug: bool, events: &[GameEvent]) {
    let snapshot = game.snapshot();
    print!("\x1b[2J\x1b[H"); // Clear screen
    println!("{}", render::TITLE);
    println!("{}\n", render::controls(debug));
    print!("{}", render::board(&snapshot));
    print!("{}", render::events(&snapshot, events));
    let _ = io::stdout().flush();
}

fn parse_input(bytes: &[u8], debug: bool) -> InputAction {
    match bytes {
        // Arrow keys (escape sequences)
        [27, 91, 65] => InputAction::Move(Direction::Up),    // Up arrow
        [27, 91, 66] => InputAction::Move(Direction::Down),  // Down arrow
        [27, 91, 67] => InputAction::Move(Direction::Right), // Right arrow
        [27, 91, 68] => InputAction::Move(Direction::Left),  // Left arrow

        // WASD keys
        [b'w'] | [b'W'] => InputAction::Move(Direction::Up),
        [b's'] | [b'S'] => InputAction::Move(Direction::Down),
        [b'a'] | [b'A'] => InputAction::Move(Direction::Left),
        [b'd'] | [b'D'] => InputAction::Move(Direction::Right),

        // Control keys
        [b'q'] | [b'Q'] | [3] | [27] => InputAction::Quit, // q, Q, Ctrl+C, Esc
        [b'r'] | [b'R'] | [b' '] => InputAction::Restart,
        [b'c'] | [b'C'] => InputAction::Continue,
        [b'm'] | [b'M'] => InputAction::NextMode,

        // Debug keys
        [b'g'] | [b'G'] if debug => InputAction::Debug(DebugAction::GameOver),
        [b'v'] | [b'V'] if debug => InputAction::Debug(DebugAction::Win),
        [b'f'] | [b'F'] if debug => InputAction::Debug(DebugAction::Fill),
        [b't'] | [b'T'] if debug => InputAction::Debug(DebugAction::Add2048),

        _ => InputAction::None,
    }
}

// =============================================================================
// Headless mode
// =============================================================================

#[derive(Debug, Default)]
struct Summary {
    scores: Vec<u32>,
    max_tiles: Vec<u32>,
    /// Episodes that won at each level.
    wins: BTreeMap<u32, u32>,
    best_score: u32,
}

/// Run headless simulation mode.
///
/// Episodes share an in-memory store so the best score carries over, but
/// nothing is written back to the store file.
fn run_headless(args: &Args, mode: GameMode, episodes: u32) {
    let summary = simulate(args, mode, episodes);
    print_summary(args, mode, &summary);
}

fn simulate(args: &Args, mode: GameMode, episodes: u32) -> Summary {
    let mut summary = Summary::default();
    let mut store = MemoryStore::new();
    game_2048_core::storage::save_game_mode(&mut store, mode);

    // Use a separate RNG for action selection
    let mut action_rng = SmallRng::seed_from_u64(args.seed.wrapping_add(1000));

    for episode in 0..episodes {
        let episode_seed = args.seed.wrapping_add(u64::from(episode));
        let mut game = Game::with_store(store, episode_seed);
        let mut steps = 0;
        let mut action_cycle = 0;

        while !game.is_done() && (args.max_steps == 0 || steps < args.max_steps) {
            let direction = match args.policy {
                Policy::Random => select_random_direction(&game.legal_directions(), &mut action_rng),
                Policy::Cycle => select_cycle_direction(&game.legal_directions(), &mut action_cycle),
            };

            let Some(direction) = direction else {
                break; // No valid moves
            };

            let outcome = game.step(direction);
            steps += 1;
            for event in &outcome.events {
                if let GameEvent::Achievement { level, is_win: true, .. } = event {
                    *summary.wins.entry(*level).or_insert(0) += 1;
                }
            }
            if game.is_won() {
                let _ = game.continue_game();
            }

            if args.verbose {
                println!("Episode {} Step {}: {:?}", episode + 1, steps, direction);
                print!("{}", game);
            }
        }

        info!(
            "episode {}: score={} max_tile={} steps={}",
            episode + 1,
            game.score(),
            game.highest_tile(),
            steps
        );
        if args.verbose {
            println!(
                "Episode {}: Score={}, MaxTile={}, Steps={}",
                episode + 1,
                game.score(),
                game.highest_tile(),
                steps
            );
        }

        summary.scores.push(game.score());
        summary.max_tiles.push(game.highest_tile());
        summary.best_score = game.best_score();
        store = game.store().clone();
    }

    summary
}

fn print_summary(args: &Args, mode: GameMode, summary: &Summary) {
    let episodes = summary.scores.len();
    if episodes == 0 {
        println!("=== Simulation Results ===");
        println!("episodes=0");
        return;
    }

    let total_score: u64 = summary.scores.iter().map(|&s| u64::from(s)).sum();
    let avg_score = total_score as f64 / episodes as f64;
    let mut scores = summary.scores.clone();
    scores.sort_unstable();
    let median_score = if episodes % 2 == 0 {
        (f64::from(scores[episodes / 2 - 1]) + f64::from(scores[episodes / 2])) / 2.0
    } else {
        f64::from(scores[episodes / 2])
    };

    // Count tile distribution
    let mut tile_counts: BTreeMap<u32, u32> = BTreeMap::new();
    for &tile in &summary.max_tiles {
        *tile_counts.entry(tile).or_insert(0) += 1;
    }

    // Output results in parseable format
    println!("=== Simulation Results ===");
    println!("episodes={}", episodes);
    println!("policy={:?}", args.policy);
    println!("seed={}", args.seed);
    println!("mode={}", mode);
    println!("max_steps={}", args.max_steps);
    println!("avg_score={:.2}", avg_score);
    println!("median_score={:.2}", median_score);
    println!("min_score={}", scores.first().copied().unwrap_or(0));
    println!("max_score={}", scores.last().copied().unwrap_or(0));
    println!("best_score={}", summary.best_score);
    println!(
        "max_tile_overall={}",
        summary.max_tiles.iter().copied().max().unwrap_or(0)
    );
    println!("tile_distribution={}", join_counts(&tile_counts));
    println!("wins={}", join_counts(&summary.wins));
}

fn join_counts(counts: &BTreeMap<u32, u32>) -> String {
    counts
        .iter()
        .map(|(value, count)| format!("{}:{}", value, count))
        .collect::<Vec<_>>()
        .join(",")
}

/// Select a random valid direction.
fn select_random_direction<R: Rng>(legal: &[bool; 4], rng: &mut R) -> Option<Direction> {
    let valid: Vec<Direction> = Direction::all()
        .into_iter()
        .zip(legal)
        .filter(|(_, ok)| **ok)
        .map(|(direction, _)| direction)
        .collect();

    if valid.is_empty() {
        None
    } else {
        Some(valid[rng.gen_range(0..valid.len())])
    }
}

/// Select direction in a cycle: Left, Down, Right, Up.
fn select_cycle_direction(legal: &[bool; 4], cycle: &mut usize) -> Option<Direction> {
    let order = [Direction::Left, Direction::Down, Direction::Right, Direction::Up];

    // Try directions in cycle order, starting from current position
    for _ in 0..4 {
        let direction = order[*cycle % 4];
        *cycle += 1;
        if legal[direction as usize] {
            return Some(direction);
        }
    }

    None
}

// Platform-specific terminal raw mode handling
#[cfg(unix)]
fn enable_raw_mode() {
    use std::os::unix::io::AsRawFd;
    unsafe {
        let fd = io::stdin().as_raw_fd();
        let mut termios: libc::termios = std::mem::zeroed();
        libc::tcgetattr(fd, &mut termios);
        termios.c_lflag &= !(libc::ICANON | libc::ECHO);
        termios.c_cc[libc::VMIN] = 1;
        termios.c_cc[libc::VTIME] = 0;
        libc::tcsetattr(fd, libc::TCSANOW, &termios);
    }
}

#[cfg(unix)]
fn disable_raw_mode() {
    use std::os::unix::io::AsRawFd;
    unsafe {
        let fd = io::stdin().as_raw_fd();
        let mut termios: libc::termios = std::mem::zeroed();
        libc::tcgetattr(fd, &mut termios);
        termios.c_lflag |= libc::ICANON | libc::ECHO;
        libc::tcsetattr(fd, libc::TCSANOW, &termios);
    }
}

#[cfg(not(unix))]
fn enable_raw_mode() {
    // On non-Unix systems, just continue without raw mode
    // Interactive mode will require Enter after each key
}

#[cfg(not(unix))]
fn disable_raw_mode() {}
