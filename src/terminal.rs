//! Line-based terminal host.
//!
//! Reads one command per line from stdin and prints the board after every
//! change. Remote games also react to batches from the poller.

use anyhow::Result;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use strictly_reversi::{
    Color, GameId, GameState, LocalController, MoveError, MoveLog, ParsePositionError, Phase,
    Position, RemoteController,
};
use strum::IntoEnumIterator;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, instrument, warn};

/// One line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Place a stone.
    Place(Position),
    /// Start over.
    Restart,
    /// Leave.
    Quit,
    /// Show commands.
    Help,
}

impl FromStr for Input {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "q" | "quit" | "exit" => Ok(Input::Quit),
            "r" | "restart" => Ok(Input::Restart),
            "?" | "h" | "help" => Ok(Input::Help),
            other => other.parse().map(Input::Place),
        }
    }
}

const HELP: &str = "Enter a square like d3, `restart`, or `quit`.";

const REMOTE_HELP: &str = "Enter a square like d3, or `quit`. \
    `restart` leaves the game and exits; host or join again for a new one.";

fn render(game: &GameState) {
    println!("\n{}", game.board());
    let totals: Vec<String> = Color::iter()
        .map(|color| format!("{} {} {}", color.symbol(), color, game.count().of(color)))
        .collect();
    println!("{}", totals.join("  "));
    match game.phase() {
        Phase::InProgress(color) => {
            let moves: Vec<String> = game.valid_moves().iter().map(ToString::to_string).collect();
            println!("{} {} to move: {}", color.symbol(), color, moves.join(" "));
        }
        Phase::Terminal(outcome) => println!("Game over. {}", outcome),
    }
}

/// Plays a game with both sides at this terminal.
#[instrument(skip(mirror))]
pub async fn run_local(mirror: Option<Arc<dyn MoveLog>>) -> Result<()> {
    let mut controller = match mirror {
        Some(log) => LocalController::mirrored(log),
        None => LocalController::new(),
    };
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", HELP);
    render(controller.start().await?);

    while let Some(line) = lines.next_line().await? {
        match line.parse::<Input>() {
            Ok(Input::Quit) => break,
            Ok(Input::Help) => println!("{}", HELP),
            Ok(Input::Restart) => {
                controller.restart();
                render(controller.start().await?);
            }
            Ok(Input::Place(pos)) => match controller.submit_move(pos) {
                Ok(game) => render(game),
                Err(e) => println!("{}", e),
            },
            Err(e) => println!("{}", e),
        }
    }

    controller.flush().await;
    info!("Local game finished");
    Ok(())
}

/// Plays one side of a remote game. Hosts when `join` is `None`.
#[instrument(skip(log))]
pub async fn run_remote(
    log: Arc<dyn MoveLog>,
    poll_interval: Duration,
    join: Option<GameId>,
) -> Result<()> {
    let mut controller = RemoteController::new(log, poll_interval);
    let session = match join {
        Some(game_id) => controller.join(game_id).await?,
        None => controller.create().await?,
    };
    println!(
        "Game {} - you play {}",
        session.game_id(),
        session.peer().my_color()
    );
    println!("{}", REMOTE_HELP);
    render(session.game());

    let mut batches = controller.start_polling();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            Some(batch) = batches.recv() => {
                if controller.apply_batch(batch) {
                    if let Some(game) = controller.game() {
                        render(game);
                    }
                }
                if let Some(e) = controller.session().and_then(|s| s.last_error()) {
                    warn!(error = %e, "Out of sync with move log");
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.parse::<Input>() {
                    Ok(Input::Quit) => break,
                    Ok(Input::Help) => println!("{}", REMOTE_HELP),
                    Ok(Input::Restart) => {
                        controller.restart();
                        println!("Left the game.");
                        break;
                    }
                    Ok(Input::Place(pos)) => match controller.submit_move(pos) {
                        Ok(game) => render(game),
                        Err(MoveError::NotYourTurn(_)) => println!("Waiting for the opponent."),
                        Err(e) => println!("{}", e),
                    },
                    Err(e) => println!("{}", e),
                }
            }
        }
    }

    controller.flush().await;
    info!("Remote game finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_parsing() {
        assert_eq!("d3".parse::<Input>().unwrap(), Input::Place("d3".parse().unwrap()));
        assert_eq!(" Quit ".parse::<Input>().unwrap(), Input::Quit);
        assert_eq!("r".parse::<Input>().unwrap(), Input::Restart);
        assert!("z9".parse::<Input>().is_err());
    }

    #[test]
    fn test_remote_help_says_restart_exits() {
        assert!(REMOTE_HELP.contains("`restart` leaves the game and exits"));
        assert!(HELP.contains("`restart`"));
    }
}
