// Point encoding for a fixed-size board
//
// A 2d cell is packed into a single index into an array of width * height
// cells:
//
//   point = y * width + x
//
// and unpacked again with
//
//   x = point % width
//   y = point / width
//
// `y` grows downward, so "up" is y - 1.

use crate::error::SnakeError;
use crate::types::Direction;

/// A packed board cell. 16 bits covers boards up to 256 * 256.
pub type Point = u16;

/// Largest number of cells a `Point` can address
pub const MAX_CELLS: usize = Point::MAX as usize + 1;

/// Board dimensions plus the arithmetic for moving between points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
}

impl Grid {
    /// Creates a grid for a `width` x `height` board
    ///
    /// # Returns
    /// * `Err(SnakeError::MalformedSnapshot)` for empty boards or boards too
    ///   large to address with a `Point`
    pub fn new(width: i32, height: i32) -> Result<Self, SnakeError> {
        if width <= 0 || height <= 0 {
            return Err(SnakeError::MalformedSnapshot(format!(
                "board dimensions must be positive, got {}x{}",
                width, height
            )));
        }

        let cells = width as usize * height as usize;
        if cells > MAX_CELLS {
            return Err(SnakeError::MalformedSnapshot(format!(
                "board of {}x{} has {} cells, at most {} are supported",
                width, height, cells, MAX_CELLS
            )));
        }

        Ok(Grid { width, height })
    }

    /// Number of cells on the board
    pub fn cells(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns the point for (x, y) if it lies on the board
    pub fn encode(&self, x: i32, y: i32) -> Option<Point> {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return None;
        }
        Some((y * self.width + x) as Point)
    }

    /// Like `encode`, but an off-board coordinate is an error
    pub fn must_encode(&self, x: i32, y: i32) -> Result<Point, SnakeError> {
        self.encode(x, y).ok_or(SnakeError::CoordinateOutOfRange {
            x,
            y,
            width: self.width,
            height: self.height,
        })
    }

    pub fn decode_x(&self, p: Point) -> i32 {
        i32::from(p) % self.width
    }

    pub fn decode_y(&self, p: Point) -> i32 {
        i32::from(p) / self.width
    }

    /// The point one step from `p` in `direction`, or `None` at the board edge
    pub fn neighbor(&self, p: Point, direction: Direction) -> Option<Point> {
        let (x, y) = (self.decode_x(p), self.decode_y(p));
        match direction {
            Direction::Up => self.encode(x, y - 1),
            Direction::Down => self.encode(x, y + 1),
            Direction::Left => self.encode(x - 1, y),
            Direction::Right => self.encode(x + 1, y),
        }
    }

    /// The direction that takes `from` to `to`, if they are adjacent
    pub fn direction_between(&self, from: Point, to: Point) -> Option<Direction> {
        Direction::all()
            .into_iter()
            .find(|&direction| self.neighbor(from, direction) == Some(to))
    }

    /// All on-board neighbors of `p`, in up, down, left, right order.
    ///
    /// Candidate moves are generated in this order, so it also decides ties
    /// between equally scored moves.
    pub fn neighbors(&self, p: Point) -> impl Iterator<Item = Point> + '_ {
        Direction::all()
            .into_iter()
            .filter_map(move |direction| self.neighbor(p, direction))
    }

    pub fn manhattan_distance(&self, a: Point, b: Point) -> u32 {
        self.decode_x(a).abs_diff(self.decode_x(b)) + self.decode_y(a).abs_diff(self.decode_y(b))
    }

    /// Renders `p` as "(x, y)"
    pub fn describe(&self, p: Point) -> String {
        format!("({}, {})", self.decode_x(p), self.decode_y(p))
    }
}
