// The controlled snake during lookahead
//
// A snake is its body, head first, plus a flag saying whether it is growing.
// A growing snake's next body keeps the old tail, so it is one longer. The
// flag is raised the turn the snake eats and takes effect on the following
// move.

use crate::error::SnakeError;
use crate::grid::Point;
use crate::position::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: Vec<Point>,
    grow: bool,
}

impl Snake {
    /// Builds a non-growing snake from its body, head first
    ///
    /// # Returns
    /// * `Err(SnakeError::MalformedSnapshot)` if `body` is empty
    pub fn from_body(body: Vec<Point>) -> Result<Self, SnakeError> {
        if body.is_empty() {
            return Err(SnakeError::MalformedSnapshot(
                "snake body is empty".to_string(),
            ));
        }
        Ok(Snake { body, grow: false })
    }

    /// Returns this snake with its growth flag set to `grow`
    pub fn with_growth(mut self, grow: bool) -> Self {
        self.grow = grow;
        self
    }

    pub fn head(&self) -> Point {
        self.body[0]
    }

    pub fn tail(&self) -> Point {
        self.body[self.body.len() - 1]
    }

    pub fn body(&self) -> &[Point] {
        &self.body
    }

    pub fn is_growing(&self) -> bool {
        self.grow
    }

    /// Length including a promised segment: a growing snake already counts
    /// the cell it will gain on its next move
    pub fn length(&self) -> usize {
        self.body.len() + usize::from(self.grow)
    }

    /// The snake after moving its head to `head`
    pub fn with_new_head(&self, head: Point) -> Snake {
        let kept = if self.grow {
            &self.body[..]
        } else {
            &self.body[..self.body.len() - 1]
        };

        let mut body = Vec::with_capacity(kept.len() + 1);
        body.push(head);
        body.extend_from_slice(kept);
        Snake { body, grow: false }
    }

    /// Frees our tail on the board before anyone moves, so any snake
    /// (including this one) may step into it this turn.
    ///
    /// A growing snake keeps its tail. So does a tail that another segment
    /// still covers, as with the stacked body at the start of a game.
    pub fn prepare_turn(&self, position: &mut Position) {
        if self.grow {
            return;
        }
        let tail = self.tail();
        if !self.body[..self.body.len() - 1].contains(&tail) {
            position.release(tail);
        }
    }

    /// Every snake reachable by one move onto a free neighbor, in up, down,
    /// left, right order
    pub fn candidate_next_states(&self, position: &Position) -> Vec<Snake> {
        // Occupied heads are treated as blocked, including those of shorter
        // snakes we could win a head-to-head against
        position
            .grid()
            .neighbors(self.head())
            .filter(|&head| position.is_free_at(head))
            .map(|head| self.with_new_head(head))
            .collect()
    }

    /// Applies this snake's move to `position`: claims the head cell and
    /// eats any food there. The returned snake grows on its next move if it ate.
    pub fn apply_move(mut self, position: &mut Position) -> Snake {
        let head = self.head();
        position.occupy(head);
        if position.has_food_at(head) {
            position.consume_food_at(head);
            self.grow = true;
        }
        self
    }
}
