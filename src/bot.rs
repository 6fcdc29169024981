// Move selection and the endpoint-facing Bot
//
// Each turn the request is turned into a root Position, every legal first move
// is scored by bounded lookahead, and the chosen move's head is mapped back to
// a direction. Being boxed in is not an error: the fallback move is sent.

use log::{debug, error, info, warn};
use serde_json::{json, Value};
use std::time::{Duration, Instant};

use crate::config::{Config, SearchConfig, Selection};
use crate::error::SnakeError;
use crate::position::Position;
use crate::types::{Battlesnake, Board, Direction, Game};

/// Battlesnake Bot with OOP-style API
/// Takes static configuration dependencies and exposes methods corresponding to API endpoints
pub struct Bot {
    config: Config,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration
    pub fn new(config: Config) -> Self {
        Bot { config }
    }

    /// Returns bot metadata and appearance
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        let appearance = &self.config.appearance;
        json!({
            "apiversion": "1",
            "author": appearance.author,
            "color": appearance.color,
            "head": appearance.head,
            "tail": appearance.tail,
        })
    }

    /// Called when a game starts
    /// Corresponds to POST /start endpoint
    pub fn start(&self, game: &Game, _turn: &i32, _board: &Board, _you: &Battlesnake) {
        info!("GAME START {}", game.id);
    }

    /// Called when a game ends
    /// Corresponds to POST /end endpoint
    pub fn end(&self, game: &Game, turn: &i32, _board: &Board, _you: &Battlesnake) {
        info!("GAME OVER {} after {} turns", game.id, turn);
    }

    /// Computes and returns the next move
    /// Corresponds to POST /move endpoint
    ///
    /// The search runs on a blocking worker. If it has not finished within the
    /// effective time budget the fallback move is sent instead.
    ///
    /// # Returns
    /// * `Ok(Value)` - JSON response containing the chosen move direction
    /// * `Err(SnakeError)` - the request could not be turned into a position
    pub async fn get_move(
        &self,
        _game: &Game,
        turn: &i32,
        board: &Board,
        you: &Battlesnake,
    ) -> Result<Value, SnakeError> {
        let start_time = Instant::now();

        info!("Turn {}: Computing move", turn);

        let board = board.clone();
        let you = you.clone();
        let search = self.config.search.clone();
        let fallback = search.fallback_move;

        let task = tokio::task::spawn_blocking(move || Bot::select_move(&board, &you, &search));

        let budget = Duration::from_millis(self.config.timing.effective_budget_ms());
        let chosen_move = match tokio::time::timeout(budget, task).await {
            Ok(Ok(result)) => result?,
            Ok(Err(e)) => {
                error!("Turn {}: search task failed ({}), sending {}", turn, e, fallback);
                fallback
            }
            Err(_) => {
                warn!(
                    "Turn {}: search exceeded {}ms budget, sending {}",
                    turn,
                    budget.as_millis(),
                    fallback
                );
                fallback
            }
        };

        info!(
            "Turn {}: Chose {} (time: {}ms)",
            turn,
            chosen_move.as_str(),
            start_time.elapsed().as_millis()
        );

        Ok(json!({ "move": chosen_move.as_str() }))
    }

    /// Picks a direction for `you` on `board`.
    ///
    /// Scores every position one legal move away, orders them according to
    /// `search.selection` and moves toward the first. With no legal move the
    /// fallback direction is returned.
    pub fn select_move(
        board: &Board,
        you: &Battlesnake,
        search: &SearchConfig,
    ) -> Result<Direction, SnakeError> {
        let root = Position::from_request(board, you)?;
        let grid = root.grid();
        debug!(
            "Searching from {} with {} free cells",
            grid.describe(root.head()),
            root.free_cells()
        );

        let scored: Vec<(u32, Position)> = root
            .next_states()
            .into_iter()
            .map(|future| (future.score_to_depth(search.max_depth), future))
            .collect();

        for (score, future) in &scored {
            debug!(
                "{} -> {}: survives {} of {} turns",
                grid.describe(root.head()),
                grid.describe(future.head()),
                score,
                search.max_depth
            );
        }

        let direction = pick(scored, search.selection)
            .and_then(|future| grid.direction_between(root.head(), future.head()));

        match direction {
            Some(direction) => Ok(direction),
            None => {
                info!("No legal moves available, sending {}", search.fallback_move);
                Ok(search.fallback_move)
            }
        }
    }
}

/// Orders scored candidates with a stable sort and returns the first.
///
/// `LowestScore` sorts with `Position::by_score`'s ascending order, so the first
/// candidate is the lowest-scoring one. Ties keep generation order under both
/// selections.
pub fn pick<T>(mut scored: Vec<(u32, T)>, selection: Selection) -> Option<T> {
    match selection {
        Selection::LowestScore => scored.sort_by(Position::by_cached_score),
        Selection::HighestScore => scored.sort_by(|a, b| Position::by_cached_score(b, a)),
    }
    scored.into_iter().next().map(|(_, candidate)| candidate)
}
