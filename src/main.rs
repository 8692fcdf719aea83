/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs::File;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};

use config::{GameConfig, LogConfig};
use domain::grid::Grid;
use domain::rules::Direction;
use sim::diff;
use sim::level::{builtin_level, load_level_file};
use sim::replay;
use sim::step;
use sim::stop::StopToken;
use sim::world::GameState;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::{end_message, Renderer};
use ui::sound::{self, SoundEngine};

const FRAME_SLEEP: Duration = Duration::from_millis(5);
/// How long the final board stays up before the terminal is restored.
const END_PAUSE: Duration = Duration::from_millis(1500);

/// Gemfall: dig through the cave, collect gems, dodge falling rocks.
#[derive(Debug, Parser)]
#[command(
    name = "gemfall",
    version,
    about = "Falling-rock cave digger in the terminal",
    long_about = "Gemfall is a terminal cave digger. Move with the arrow keys or WASD, \
        collect gems ($), push rocks (O) sideways, and reach the exit (E). \
        Rocks and gems fall and roll; one landing on you ends the run.\n\n\
        Press q, Esc or Ctrl+C to quit."
)]
struct Args {
    /// Level file: exactly width x height bytes. Defaults to the built-in level.
    #[arg(short, long)]
    level: Option<PathBuf>,

    /// Config file (default: config.toml next to the binary or in CWD).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Milliseconds per tick.
    #[arg(long, value_name = "MS")]
    tick_ms: Option<u64>,

    /// Level row width in bytes, including the trailing newline.
    #[arg(long)]
    width: Option<usize>,

    /// Level height in rows.
    #[arg(long)]
    height: Option<usize>,

    /// Run a move script (U, D, L, R, '.' for no input) without a terminal
    /// and print the final board.
    #[arg(long, value_name = "MOVES")]
    replay: Option<String>,

    /// Write log output to this file.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Disable sound effects.
    #[arg(long)]
    no_sound: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = GameConfig::load(args.config.as_deref());
    apply_args(&mut config, &args);
    init_logging(&config.log)?;
    for w in &config.warnings {
        warn!("config: {w}");
    }

    let grid = load_grid(&config)?;
    let mut state = GameState::new(grid)?;

    if let Some(script) = &args.replay {
        return run_replay(&mut state, script);
    }

    // Device probes may log; do them while stderr is still the normal screen.
    let sound = if config.sound { SoundEngine::new() } else { None };
    let mut gamepad = GamepadState::new();
    gamepad.load_button_config(&config.gamepad);
    if gamepad.connected {
        info!("gamepad detected");
    }

    let stop = StopToken::new();
    let mut renderer = Renderer::new(state.committed.height());
    renderer.init().context("terminal init failed")?;

    let result = game_loop(
        &mut state,
        &mut renderer,
        sound.as_ref(),
        &mut gamepad,
        &config,
        &stop,
    );

    if let Err(e) = renderer.cleanup() {
        warn!("terminal cleanup failed: {e}");
    }
    result?;

    match state.outcome() {
        Some(outcome) => {
            info!("game over after {} ticks: {:?}", state.tick, outcome);
            println!("{}", end_message(&outcome));
        }
        None => {
            info!("quit after {} ticks", state.tick);
            println!("Quit with {} gems collected.", state.gems_collected);
        }
    }
    Ok(())
}

/// Command-line flags override config.toml.
fn apply_args(config: &mut GameConfig, args: &Args) {
    if let Some(level) = &args.level {
        config.level = Some(level.clone());
    }
    if let Some(ms) = args.tick_ms {
        config.tick_rate_ms = ms.max(1);
    }
    if let Some(w) = args.width {
        config.dims.width = w;
    }
    if let Some(h) = args.height {
        config.dims.height = h;
    }
    if let Some(path) = &args.log_file {
        config.log.file = Some(path.clone());
    }
    if args.no_sound {
        config.sound = false;
    }
}

/// `RUST_LOG` wins over the configured level. Without a log file, output
/// goes to stderr and shares the terminal with the board, so anything
/// logged mid-game lands on screen. Set `log.file` for verbose levels.
fn init_logging(cfg: &LogConfig) -> Result<()> {
    let env = env_logger::Env::default().default_filter_or(cfg.level.as_str());
    let mut builder = env_logger::Builder::from_env(env);
    if let Some(path) = &cfg.file {
        let file = File::create(path)
            .with_context(|| format!("could not create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.try_init().context("logger already initialized")?;
    Ok(())
}

/// A missing or malformed level is fatal: no tick runs without one.
fn load_grid(config: &GameConfig) -> Result<Grid> {
    match &config.level {
        Some(path) => load_level_file(path, config.dims)
            .with_context(|| format!("failed to load level {}", path.display())),
        None => builtin_level().context("built-in level is malformed"),
    }
}

fn run_replay(state: &mut GameState, script: &str) -> Result<()> {
    let moves = replay::parse_moves(script)?;
    let report = replay::run(state, &moves);
    print!("{}", state.working);
    match report.outcome {
        Some(outcome) => println!("{} ({} ticks)", end_message(&outcome), report.ticks),
        None => println!(
            "No outcome after {} ticks, {} gems collected.",
            report.ticks, state.gems_collected,
        ),
    }
    Ok(())
}

fn game_loop(
    state: &mut GameState,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    gp: &mut GamepadState,
    config: &GameConfig,
    stop: &StopToken,
) -> Result<()> {
    let mut kb = InputState::new();
    let tick_rate = Duration::from_millis(config.tick_rate_ms);

    renderer.draw(&diff::full_frame(&state.committed, state.tick))?;
    renderer.draw_status(state.gems_collected)?;
    renderer.flush()?;

    // Previous committed board, for the per-tick diff.
    let mut prev = state.committed.clone();
    let mut last_tick = Instant::now();

    while !stop.is_cancelled() {
        kb.drain_events()?;
        gp.update();
        if kb.quit_requested() || gp.quit_requested() {
            stop.cancel();
            continue;
        }

        // Late ticks start right away; missed ticks are not made up.
        if last_tick.elapsed() < tick_rate {
            std::thread::sleep(FRAME_SLEEP);
            continue;
        }
        last_tick = Instant::now();

        let dir = match kb.take_direction() {
            Direction::None => gp.take_direction(),
            d => d,
        };

        prev.copy_from(&state.committed);
        let events = step::step(state, dir);
        if !events.is_empty() {
            debug!("tick {}: {:?}", state.tick, events);
        }
        sound::play_events(sound, &events);

        renderer.draw(&diff::diff(&prev, &state.working, state.tick))?;
        renderer.draw_status(state.gems_collected)?;

        if let Some(outcome) = state.outcome() {
            renderer.draw_end_message(&outcome)?;
            renderer.flush()?;
            std::thread::sleep(END_PAUSE);
            break;
        }
        renderer.flush()?;
    }

    Ok(())
}
