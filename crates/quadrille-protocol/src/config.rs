use clap::Args;
use serde::{Deserialize, Serialize};

#[derive(Args, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    #[arg(
        long,
        default_value_t = 128,
        help = "Elite pool size (K); each generation breeds K children"
    )]
    pub population_size: usize,

    #[arg(
        long,
        help = "Parallel islands per machine (defaults to the hardware thread count)"
    )]
    pub workers: Option<usize>,

    #[arg(
        long,
        default_value_t = 10_000,
        help = "Wall-clock budget per solve in milliseconds"
    )]
    pub deadline_ms: u64,

    #[arg(long, help = "PRNG seed; omit for a nondeterministic run")]
    pub seed: Option<u64>,

    #[arg(
        long,
        default_value_t = 10_000,
        help = "Magnitude of the integer split-line coefficients used by crossover"
    )]
    pub line_coefficient_range: u32,

    #[arg(
        long,
        default_value_t = 64,
        help = "Generations between best-solution exchanges with peer islands"
    )]
    pub share_interval: u64,

    #[arg(
        long,
        help = "Stop after this many generations even if the deadline has not elapsed"
    )]
    pub max_generations: Option<u64>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            population_size: 128,
            workers: None,
            deadline_ms: 10_000,
            seed: None,
            line_coefficient_range: 10_000,
            share_interval: 64,
            max_generations: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_roundtrip_json() {
        let params = SearchParams::default();
        let json = serde_json::to_string(&params).unwrap();
        let back: SearchParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back.population_size, 128);
        assert_eq!(back.deadline_ms, 10_000);
        assert_eq!(back.seed, None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let back: SearchParams = serde_json::from_str(r#"{"population_size": 9}"#).unwrap();
        assert_eq!(back.population_size, 9);
        assert_eq!(back.line_coefficient_range, 10_000);
    }
}
