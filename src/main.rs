use anyhow::Result;
use clap::{Parser, ValueEnum};
use quarto::messages::{Request, Response};
use quarto::{GameConfig, GameState, PieceRng, PlayerNum, ValidAction};
use serde_json::from_str;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn, Level};

/// Plays one Quarto session over stdin/stdout, one JSON request per line.
#[derive(Parser, Debug)]
#[command(name = "quarto")]
#[command(version)]
struct Cli {
    /// Seed for the piece numbering, random if omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Player who chooses the first piece
    #[arg(long, value_enum, default_value = "p1")]
    first_player: FirstPlayer,

    /// Directory for the daily rolling log file
    #[arg(long, default_value = "./logs")]
    log_dir: PathBuf,

    /// Log every transition, not only game over and rejections
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FirstPlayer {
    P1,
    P2,
}

impl From<FirstPlayer> for PlayerNum {
    fn from(player: FirstPlayer) -> Self {
        match player {
            FirstPlayer::P1 => PlayerNum::P1,
            FirstPlayer::P2 => PlayerNum::P2,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let file_appender = tracing_appender::rolling::daily(&cli.log_dir, "quarto.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(non_blocking)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let rng = cli.seed.map(PieceRng::seeded).unwrap_or_default();
    let config = GameConfig {
        starting_player: cli.first_player.into(),
    };
    let mut game_state = GameState::new(config, rng);
    info!(seed = ?cli.seed, starting_player = %config.starting_player, "session started");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_response(&mut out, &Response::State(game_state.snapshot()))?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_line(&mut game_state, &line);
        write_response(&mut out, &response)?;
    }

    info!("session ended");
    Ok(())
}

fn handle_line(game_state: &mut GameState, line: &str) -> Response {
    let request: Request = match from_str(line) {
        Ok(request) => request,
        Err(err) => {
            warn!("Failed to deserialize request: {}", err);
            return err.into();
        }
    };
    let Some(action) = request.into_action() else {
        return Response::State(game_state.snapshot());
    };
    match ValidAction::new(action).and_then(|action| game_state.apply(action)) {
        Ok(snapshot) => Response::State(snapshot),
        Err(err) => {
            warn!(reason = err.reason(), "Invalid game input: {}", err);
            err.into()
        }
    }
}

fn write_response(out: &mut impl Write, response: &Response) -> Result<()> {
    serde_json::to_writer(&mut *out, response)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
