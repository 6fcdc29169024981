// One node of the lookahead tree
//
// A position groups the grid, our snake, the opponents, the occupied cells
// and the food. Cloning a position is how the search branches: the board
// bitfield is copied, while the snake, the opponents and the food are shared
// until a branch needs its own. Food is copy-on-write through `Rc::make_mut`.

use log::trace;
use std::cmp::Ordering;
use std::rc::Rc;

use crate::bitfield::Bitfield;
use crate::error::SnakeError;
use crate::grid::{Grid, Point};
use crate::mob::SnakeMob;
use crate::snake::Snake;
use crate::types::{Battlesnake, Board, Coord};

/// Default depth at which `score` stops looking
pub const MAX_DEPTH: u32 = 3;

#[derive(Debug, Clone)]
pub struct Position {
    grid: Grid,
    you: Rc<Snake>,
    others: Rc<SnakeMob>,
    board: Bitfield,
    food: Rc<Bitfield>,
}

impl Position {
    /// Builds the root position for a turn.
    ///
    /// `you` is the controlled snake; every other entry in `board.snakes` is an
    /// opponent. The board bitfield starts as the union of all bodies.
    ///
    /// # Returns
    /// * `Err(SnakeError)` if the board is unusable, our body is empty, or any
    ///   listed coordinate is off the board
    pub fn from_request(board: &Board, you: &Battlesnake) -> Result<Self, SnakeError> {
        let grid = Grid::new(board.width, board.height)?;
        let encode = |c: &Coord| grid.must_encode(c.x, c.y);

        let body = you.body.iter().map(encode).collect::<Result<Vec<_>, _>>()?;
        let snake = Snake::from_body(body)?;

        let opponents: Vec<&Battlesnake> =
            board.snakes.iter().filter(|s| s.id != you.id).collect();
        let longest = opponents.iter().map(|s| s.body.len()).max().unwrap_or(0);

        let mut mob = None;
        for rank in 0..longest {
            let heads = opponents
                .iter()
                .filter_map(|s| s.body.get(rank))
                .map(encode)
                .collect::<Result<Vec<_>, _>>()?;
            mob = Some(SnakeMob::from_heads(&heads, mob));
        }
        let mob = mob.unwrap_or_default();

        let mut occupied = Bitfield::with_capacity(grid.cells());
        for &p in snake.body().iter().chain(mob.points()) {
            occupied.set(usize::from(p));
        }

        let mut food = Bitfield::with_capacity(grid.cells());
        for c in &board.food {
            food.set(usize::from(encode(c)?));
        }

        Ok(Position {
            grid,
            you: Rc::new(snake),
            others: Rc::new(mob),
            board: occupied,
            food: Rc::new(food),
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn you(&self) -> &Snake {
        &self.you
    }

    pub fn others(&self) -> &SnakeMob {
        &self.others
    }

    pub fn head(&self) -> Point {
        self.you.head()
    }

    pub fn is_free_at(&self, p: Point) -> bool {
        !self.board.test(usize::from(p))
    }

    pub fn occupy(&mut self, p: Point) {
        self.board.set(usize::from(p));
    }

    pub fn release(&mut self, p: Point) {
        self.board.clear(usize::from(p));
    }

    pub fn has_food_at(&self, p: Point) -> bool {
        self.food.test(usize::from(p))
    }

    /// Removes the food at `p`, first taking a private copy of the food set
    /// if it is still shared with another position
    pub fn consume_food_at(&mut self, p: Point) {
        Rc::make_mut(&mut self.food).clear(usize::from(p));
    }

    /// Number of free cells on the board
    pub fn free_cells(&self) -> usize {
        self.grid.cells() - self.board.count_ones()
    }

    /// Every position reachable by one legal move of our snake, in up, down,
    /// left, right order. Empty when we have nowhere to go.
    pub fn next_states(&self) -> Vec<Position> {
        let mut intermediate = self.clone();
        self.you.prepare_turn(&mut intermediate);
        intermediate.others = SnakeMob::advance(&self.others, &intermediate);

        self.you
            .candidate_next_states(&intermediate)
            .into_iter()
            .map(|candidate| {
                let mut future = intermediate.clone();
                let candidate = candidate.apply_move(&mut future);
                future.you = Rc::new(candidate);
                future
            })
            .collect()
    }

    /// Survivability depth with the default cap of `MAX_DEPTH`
    pub fn score(&self) -> u32 {
        self.score_to_depth(MAX_DEPTH)
    }

    /// The deepest level below this position that some line of play reaches,
    /// up to `max_depth`.
    ///
    /// Depth first over an explicit stack. Returns as soon as any line reaches
    /// `max_depth`. A position with no legal move scores 0.
    pub fn score_to_depth(&self, max_depth: u32) -> u32 {
        if max_depth == 0 {
            return 0;
        }

        let mut best = 0;
        let mut nodes = 0usize;
        let mut stack: Vec<(Position, u32)> =
            self.next_states().into_iter().map(|s| (s, 1)).collect();

        while let Some((position, depth)) = stack.pop() {
            nodes += 1;
            if depth > best {
                best = depth;
                if best >= max_depth {
                    trace!("reached depth {} after {} nodes", max_depth, nodes);
                    return max_depth;
                }
            }
            stack.extend(position.next_states().into_iter().map(|s| (s, depth + 1)));
        }

        trace!("exhausted search at depth {} after {} nodes", best, nodes);
        best
    }

    /// Orders positions by ascending score
    pub fn by_score(a: &Position, b: &Position) -> Ordering {
        Self::by_cached_score(&(a.score(), ()), &(b.score(), ()))
    }

    /// The `by_score` ordering over candidates whose scores are already known
    pub fn by_cached_score<T>(a: &(u32, T), b: &(u32, T)) -> Ordering {
        a.0.cmp(&b.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(cells: &[(i32, i32)]) -> Vec<Coord> {
        cells.iter().map(|&(x, y)| Coord { x, y }).collect()
    }

    fn snake(id: &str, body: &[(i32, i32)]) -> Battlesnake {
        Battlesnake {
            id: id.to_string(),
            name: id.to_string(),
            health: 100,
            body: coords(body),
            shout: None,
        }
    }

    fn position(
        width: i32,
        height: i32,
        you: &[(i32, i32)],
        others: &[&[(i32, i32)]],
        food: &[(i32, i32)],
    ) -> Result<Position, SnakeError> {
        let you = snake("you", you);
        let mut snakes = vec![you.clone()];
        for (i, body) in others.iter().enumerate() {
            snakes.push(snake(&format!("other-{}", i), body));
        }
        let board = Board {
            width,
            height,
            food: coords(food),
            snakes,
            hazards: vec![],
        };
        Position::from_request(&board, &you)
    }

    fn at(position: &Position, x: i32, y: i32) -> Point {
        position.grid().must_encode(x, y).unwrap()
    }

    #[test]
    fn test_from_request_marks_bodies_and_food() {
        let p = position(
            10,
            10,
            &[(2, 0), (1, 0), (0, 0)],
            &[&[(5, 5), (5, 6)], &[(7, 7)]],
            &[(9, 9)],
        )
        .unwrap();

        for (x, y) in [(2, 0), (1, 0), (0, 0), (5, 5), (5, 6), (7, 7)] {
            assert!(!p.is_free_at(at(&p, x, y)), "({}, {}) should be occupied", x, y);
        }
        assert_eq!(p.free_cells(), 94);
        assert!(p.has_food_at(at(&p, 9, 9)));
        assert!(!p.has_food_at(at(&p, 5, 5)));
        assert_eq!(p.head(), at(&p, 2, 0));
        assert_eq!(p.others().heads(), &[at(&p, 5, 5), at(&p, 7, 7)]);
        assert_eq!(p.others().rank_count(), 2);
    }

    #[test]
    fn test_from_request_rejects_off_board_body() {
        let result = position(10, 10, &[(10, 0), (9, 0)], &[], &[]);
        assert!(matches!(result, Err(SnakeError::CoordinateOutOfRange { x: 10, y: 0, .. })));
    }

    #[test]
    fn test_from_request_rejects_off_board_opponent_and_food() {
        let result = position(10, 10, &[(0, 0)], &[&[(3, 3), (3, -1)]], &[]);
        assert!(matches!(result, Err(SnakeError::CoordinateOutOfRange { .. })));

        let result = position(10, 10, &[(0, 0)], &[], &[(0, 11)]);
        assert!(matches!(result, Err(SnakeError::CoordinateOutOfRange { .. })));
    }

    #[test]
    fn test_from_request_rejects_empty_body() {
        let result = position(10, 10, &[], &[], &[]);
        assert!(matches!(result, Err(SnakeError::MalformedSnapshot(_))));
    }

    #[test]
    fn test_clone_copies_board() {
        let original = position(10, 10, &[(2, 0), (1, 0), (0, 0)], &[], &[]).unwrap();
        let mut copy = original.clone();
        let cell = at(&original, 5, 5);
        copy.occupy(cell);
        assert!(original.is_free_at(cell));
        assert!(!copy.is_free_at(cell));
    }

    #[test]
    fn test_consume_food_is_copy_on_write() {
        let original = position(10, 10, &[(2, 0), (1, 0), (0, 0)], &[], &[(4, 4)]).unwrap();
        let cell = at(&original, 4, 4);

        let mut eater = original.clone();
        eater.consume_food_at(cell);

        assert!(!eater.has_food_at(cell));
        assert!(original.has_food_at(cell));
    }

    #[test]
    fn test_next_states_open_board() {
        let p = position(10, 10, &[(2, 0), (1, 0), (0, 0)], &[], &[]).unwrap();
        let heads: Vec<Point> = p.next_states().iter().map(Position::head).collect();
        assert_eq!(heads, vec![at(&p, 2, 1), at(&p, 3, 0)]);
    }

    #[test]
    fn test_next_states_moves_body() {
        let p = position(10, 10, &[(2, 0), (1, 0), (0, 0)], &[], &[]).unwrap();
        let states = p.next_states();
        let right = &states[1];

        assert_eq!(right.you().body(), &[at(&p, 3, 0), at(&p, 2, 0), at(&p, 1, 0)]);
        assert!(!right.is_free_at(at(&p, 3, 0)));
        assert!(right.is_free_at(at(&p, 0, 0)));
        // the parent is untouched
        assert!(!p.is_free_at(at(&p, 0, 0)));
        assert!(p.is_free_at(at(&p, 3, 0)));
    }

    #[test]
    fn test_next_states_never_enter_occupied_cells() {
        let p = position(
            10,
            10,
            &[(5, 5), (5, 6), (5, 7)],
            &[&[(4, 5), (3, 5)], &[(6, 4), (6, 5)]],
            &[],
        )
        .unwrap();

        for state in p.next_states() {
            assert!(p.is_free_at(state.head()));
        }
        let heads: Vec<Point> = p.next_states().iter().map(Position::head).collect();
        assert_eq!(heads, vec![at(&p, 5, 4)]);
    }

    #[test]
    fn test_next_states_may_follow_own_tail() {
        // A 2x2 loop: the only free neighbor is the cell our tail leaves
        let p = position(2, 2, &[(0, 0), (1, 0), (1, 1), (0, 1)], &[], &[]).unwrap();
        let heads: Vec<Point> = p.next_states().iter().map(Position::head).collect();
        assert_eq!(heads, vec![at(&p, 0, 1)]);
    }

    #[test]
    fn test_next_states_eating_sets_growth() {
        // Cornered at (0, 0): the only move is down, onto food
        let p = position(10, 10, &[(0, 0), (1, 0), (2, 0)], &[], &[(0, 1)]).unwrap();
        let food = at(&p, 0, 1);

        let states = p.next_states();
        assert_eq!(states.len(), 1);

        let fed = &states[0];
        assert_eq!(fed.head(), food);
        assert!(!fed.has_food_at(food));
        assert!(fed.you().is_growing());
        assert!(p.has_food_at(food));

        // The next move keeps the tail, so the body lengthens
        let grown = &fed.next_states()[0];
        assert_eq!(grown.you().body().len(), 4);
        assert!(!grown.you().is_growing());
        assert!(!grown.is_free_at(at(&p, 1, 0)));
    }

    #[test]
    fn test_opponents_do_not_move() {
        let p = position(10, 10, &[(0, 0)], &[&[(5, 5), (5, 6), (5, 7)]], &[]).unwrap();
        for state in p.next_states() {
            assert_eq!(state.others(), p.others());
            assert!(!state.is_free_at(at(&p, 5, 7)));
        }
    }

    #[test]
    fn test_score_with_no_moves_is_zero() {
        let p = position(
            10,
            10,
            &[(0, 0), (1, 0), (1, 1), (0, 1), (0, 2)],
            &[],
            &[],
        )
        .unwrap();
        assert!(p.next_states().is_empty());
        assert_eq!(p.score(), 0);
    }

    #[test]
    fn test_score_open_board_reaches_max_depth() {
        let p = position(10, 10, &[(2, 0), (1, 0), (0, 0)], &[], &[]).unwrap();
        assert_eq!(p.score(), MAX_DEPTH);
        assert_eq!(p.score_to_depth(5), 5);
    }

    #[test]
    fn test_score_counts_moves_before_dead_end() {
        // 5x1 corridor with an opponent at the far end: one step right, then stuck
        let p = position(5, 1, &[(2, 0), (1, 0), (0, 0)], &[&[(4, 0)]], &[]).unwrap();
        assert_eq!(p.score(), 1);

        // 6x1: two steps
        let p = position(6, 1, &[(2, 0), (1, 0), (0, 0)], &[&[(5, 0)]], &[]).unwrap();
        assert_eq!(p.score(), 2);
    }

    #[test]
    fn test_score_to_zero_depth() {
        let p = position(10, 10, &[(2, 0), (1, 0), (0, 0)], &[], &[]).unwrap();
        assert_eq!(p.score_to_depth(0), 0);
    }

    #[test]
    fn test_by_cached_score_matches_by_score() {
        let trapped = position(5, 1, &[(2, 0), (1, 0), (0, 0)], &[&[(4, 0)]], &[]).unwrap();
        let open = position(10, 10, &[(2, 0), (1, 0), (0, 0)], &[], &[]).unwrap();

        let scored_trapped = (trapped.score(), &trapped);
        let scored_open = (open.score(), &open);
        assert_eq!(
            Position::by_cached_score(&scored_trapped, &scored_open),
            Position::by_score(&trapped, &open)
        );
        assert_eq!(
            Position::by_cached_score(&scored_open, &scored_trapped),
            Position::by_score(&open, &trapped)
        );
    }

    #[test]
    fn test_by_score_orders_ascending() {
        let trapped = position(5, 1, &[(2, 0), (1, 0), (0, 0)], &[&[(4, 0)]], &[]).unwrap();
        let open = position(10, 10, &[(2, 0), (1, 0), (0, 0)], &[], &[]).unwrap();

        assert_eq!(Position::by_score(&trapped, &open), Ordering::Less);
        assert_eq!(Position::by_score(&open, &trapped), Ordering::Greater);
        assert_eq!(Position::by_score(&open, &open), Ordering::Equal);
    }
}
