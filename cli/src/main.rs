use std::io::{self, BufRead, Write};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use rand::Rng;
use sweepbot_core::{Board, BoardSnapshot, CellCount, Coord, GameConfig, MinefieldGenerator};
use sweepbot_protocol::Command;

use session::{GameSession, Reply};

mod session;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Difficulty {
    Beginner,
    Intermediate,
    Expert,
}

impl From<Difficulty> for GameConfig {
    fn from(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Beginner => GameConfig::beginner(),
            Difficulty::Intermediate => GameConfig::intermediate(),
            Difficulty::Expert => GameConfig::expert(),
        }
    }
}

/// Play Minesweeper on the terminal, one `guess x y` or `flag x y` per line.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Number of rows
    #[arg(long, default_value_t = 9)]
    height: Coord,

    /// Number of columns
    #[arg(long, default_value_t = 9)]
    width: Coord,

    /// Number of mines
    #[arg(short, long, default_value_t = 10)]
    mines: CellCount,

    /// Use a preset board instead of --height/--width/--mines
    #[arg(short, long, value_enum)]
    difficulty: Option<Difficulty>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Also print a JSON snapshot of the board after every move
    #[arg(long)]
    json: bool,
}

impl Args {
    fn game_config(&self) -> anyhow::Result<GameConfig> {
        let config = match self.difficulty {
            Some(difficulty) => difficulty.into(),
            None => GameConfig::new(self.height, self.width, self.mines).context("Invalid board settings")?,
        };
        anyhow::ensure!(
            config.has_opening_room(),
            "{} mines leave no safe opening on a {}x{} board",
            config.mines,
            config.height(),
            config.width()
        );
        Ok(config)
    }
}

fn show<G: MinefieldGenerator>(
    out: &mut impl Write,
    session: &GameSession<G>,
    header: &str,
    json: bool,
) -> anyhow::Result<()> {
    writeln!(out, "{}", session.message(header))?;
    if json {
        let snapshot = BoardSnapshot::from_board(session.board());
        writeln!(out, "{}", serde_json::to_string(&snapshot)?)?;
    }
    out.flush()?;
    Ok(())
}

fn play<G: MinefieldGenerator>(
    mut session: GameSession<G>,
    input: impl BufRead,
    out: &mut impl Write,
    json: bool,
) -> anyhow::Result<()> {
    show(out, &session, session.prompt(), json)?;

    for line in input.lines() {
        let line = line.context("Could not read command")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let command: Command = match line.parse() {
            Ok(command) => command,
            Err(err) => {
                log::warn!("Rejected `{}`: {}", line, err);
                writeln!(out, "{err}")?;
                continue;
            }
        };

        match session.handle(command) {
            Ok(Reply::NeedsGuess) => {
                writeln!(out, "{}", session.prompt())?;
                continue;
            }
            Ok(Reply::Applied(_)) => {}
            Err(err) => {
                log::warn!("{} failed: {}", command, err);
                writeln!(out, "{err}")?;
                continue;
            }
        }

        if let Some(message) = session.final_message() {
            log::info!(
                "Game over after {} moves: {:?}",
                session.move_count(),
                session.board().status()
            );
            return show(out, &session, message, json);
        }
        show(out, &session, session.prompt(), json)?;
    }

    log::info!("Input closed before the game ended");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.verbose.tracing_level_filter())
        .with_writer(io::stderr)
        .init();

    let config = args.game_config()?;
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    log::debug!("seed: {}", seed);
    log::info!(
        "Starting a {}x{} game with {} mines",
        config.height(),
        config.width(),
        config.mines
    );

    let session = GameSession::new(Board::new(config, seed));
    play(session, io::stdin().lock(), &mut io::stdout().lock(), args.json)
}
