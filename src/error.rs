// Errors raised while turning a request snapshot into a searchable position

use thiserror::Error;

/// Failures that abort handling of a single turn
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SnakeError {
    /// A listed body or food coordinate lies outside the declared board
    #[error("coordinate ({x}, {y}) is outside the {width}x{height} board")]
    CoordinateOutOfRange {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    /// The snapshot is structurally unusable
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),
}
