//! Scheduler configuration.

use serde::{Deserialize, Serialize};

/// Random picks allowed per chain-building attempt.
pub const DEFAULT_PICK_BUDGET: usize = 500;

/// Whole-procedure attempts before the sequencer gives up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Bounds for the triple sequencer's randomized search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencingPolicy {
    /// Random picks per attempt before the attempt is abandoned.
    pub pick_budget: usize,
    /// Attempts before the search is declared non-convergent.
    pub max_attempts: usize,
    /// Use the best partial ordering instead of failing when the search
    /// does not converge.
    pub allow_fallback: bool,
}

impl Default for SequencingPolicy {
    fn default() -> Self {
        Self {
            pick_budget: DEFAULT_PICK_BUDGET,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            allow_fallback: true,
        }
    }
}

/// Configuration for one scheduler run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Seed for every random choice in the run. `None` seeds from the OS.
    pub seed: Option<u64>,
    pub sequencing: SequencingPolicy,
    /// Shuffle the groups within each day for display.
    #[serde(default = "default_true")]
    pub shuffle_display: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            seed: None,
            sequencing: SequencingPolicy::default(),
            shuffle_display: true,
        }
    }
}

impl SchedulerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_pick_budget(mut self, picks: usize) -> Self {
        self.sequencing.pick_budget = picks;
        self
    }

    #[must_use]
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.sequencing.max_attempts = attempts;
        self
    }

    #[must_use]
    pub fn with_fallback(mut self, allow: bool) -> Self {
        self.sequencing.allow_fallback = allow;
        self
    }

    #[must_use]
    pub fn with_shuffle_display(mut self, shuffle: bool) -> Self {
        self.shuffle_display = shuffle;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SchedulerConfig::new();
        assert_eq!(config.seed, None);
        assert_eq!(config.sequencing.pick_budget, 500);
        assert_eq!(config.sequencing.max_attempts, 1000);
        assert!(config.sequencing.allow_fallback);
        assert!(config.shuffle_display);
    }

    #[test]
    fn test_builder_setters() {
        let config = SchedulerConfig::new()
            .with_seed(7)
            .with_pick_budget(50)
            .with_max_attempts(3)
            .with_fallback(false)
            .with_shuffle_display(false);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.sequencing.pick_budget, 50);
        assert_eq!(config.sequencing.max_attempts, 3);
        assert!(!config.sequencing.allow_fallback);
        assert!(!config.shuffle_display);
    }

    #[test]
    fn test_missing_shuffle_display_defaults_to_true() {
        let raw = r#"{"seed": 3, "sequencing": {"pick_budget": 10, "max_attempts": 2, "allow_fallback": false}}"#;
        let config: SchedulerConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.seed, Some(3));
        assert!(config.shuffle_display);
        assert_eq!(config.sequencing.max_attempts, 2);
    }
}
