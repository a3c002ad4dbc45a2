use crate::error::ProtocolError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A puzzle instance in challenge API format.
///
/// `puzzle` is a row-major cell mask: nonzero marks a tile that belongs to
/// the shape and must be covered, 0 marks a wall.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Puzzle {
    pub id: String,
    pub width: usize,
    pub height: usize,
    pub puzzle: Vec<Vec<u8>>,
}

impl Puzzle {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ProtocolError> {
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Fully open rectangular instance. Used by benchmarks and tests.
    pub fn open(id: &str, width: usize, height: usize) -> Self {
        Self {
            id: id.to_string(),
            width,
            height,
            puzzle: vec![vec![1; width]; height],
        }
    }
}
