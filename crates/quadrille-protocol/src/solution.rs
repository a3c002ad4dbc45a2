use serde::{Deserialize, Serialize};

/// One axis-aligned square of a decomposition, challenge API field names.
/// `(x, y)` is the top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Square {
    #[serde(rename = "X")]
    pub x: u16,
    #[serde(rename = "Y")]
    pub y: u16,
    #[serde(rename = "Size")]
    pub size: u16,
}

/// A complete answer for one puzzle: every open cell covered by exactly
/// one square. The submission score is the square count, lower is better.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    pub id: String,
    pub squares: Vec<Square>,
}

impl Solution {
    pub fn score(&self) -> usize {
        self.squares.len()
    }
}
