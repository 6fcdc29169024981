// Every other snake on the board, combined
//
// Opponents are stored rank by rank: rank 0 holds every opponent head, rank 1
// every second segment, and so on. Which segment belongs to which opponent is
// not kept; the search only needs the cells they cover.

use std::rc::Rc;

use crate::grid::Point;
use crate::position::Position;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnakeMob {
    points: Vec<Point>,
    /// End offset into `points` of each rank
    ranks: Vec<usize>,
}

impl SnakeMob {
    /// Appends one rank of segments to `previous` (or to an empty mob)
    pub fn from_heads(heads: &[Point], previous: Option<SnakeMob>) -> SnakeMob {
        let mut mob = previous.unwrap_or_default();
        mob.points.extend_from_slice(heads);
        mob.ranks.push(mob.points.len());
        mob
    }

    /// Every cell covered by an opponent
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn rank_count(&self) -> usize {
        self.ranks.len()
    }

    /// Segments at distance `rank` from their heads
    pub fn rank(&self, rank: usize) -> Option<&[Point]> {
        let end = *self.ranks.get(rank)?;
        let start = match rank {
            0 => 0,
            _ => self.ranks[rank - 1],
        };
        Some(&self.points[start..end])
    }

    pub fn heads(&self) -> &[Point] {
        self.rank(0).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The opponents one turn later.
    ///
    /// Opponents are frozen: they neither move nor branch during lookahead and
    /// act as static obstacles, so this hands back the same mob.
    pub fn advance(mob: &Rc<SnakeMob>, _position: &Position) -> Rc<SnakeMob> {
        Rc::clone(mob)
    }
}
