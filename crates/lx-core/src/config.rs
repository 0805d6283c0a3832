use std::sync::OnceLock;

fn env_true(key: &str) -> Option<bool> {
    std::env::var(key).ok().map(|val| {
        let trimmed = val.trim();
        !trimmed.is_empty() && !matches!(trimmed, "0" | "false" | "FALSE" | "False")
    })
}

fn usize_from_env(key: &str) -> Option<usize> {
    std::env::var(key).ok()?.trim().parse().ok()
}

pub const DEFAULT_MAX_INFERENCE_ROUNDS: usize = 32;

/// Knobs of the reduction engine. Carried by the root symbol table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReduceConfig {
    /// Upper bound on generic-inference fixed-point rounds per candidate.
    pub max_inference_rounds: usize,
    /// Event members can only be dispatched when the reactive adapter is present.
    pub reactive_events: bool,
    /// Wrap reduced results in implicit conversions toward the expected type.
    pub implicit_conversions: bool,
}

impl Default for ReduceConfig {
    fn default() -> Self {
        Self {
            max_inference_rounds: DEFAULT_MAX_INFERENCE_ROUNDS,
            reactive_events: false,
            implicit_conversions: true,
        }
    }
}

impl ReduceConfig {
    /// Defaults overridden by `LX_*` environment variables, read once per process.
    pub fn from_env() -> Self {
        static FROM_ENV: OnceLock<ReduceConfig> = OnceLock::new();
        FROM_ENV
            .get_or_init(|| {
                let mut config = ReduceConfig::default();
                if let Some(rounds) = usize_from_env("LX_MAX_INFERENCE_ROUNDS") {
                    config.max_inference_rounds = rounds.max(1);
                }
                if let Some(enabled) = env_true("LX_REACTIVE_EVENTS") {
                    config.reactive_events = enabled;
                }
                if env_true("LX_NO_IMPLICIT_CONVERSIONS").unwrap_or(false) {
                    config.implicit_conversions = false;
                }
                config
            })
            .clone()
    }

    pub fn with_reactive_events(mut self, enabled: bool) -> Self {
        self.reactive_events = enabled;
        self
    }

    pub fn with_max_inference_rounds(mut self, rounds: usize) -> Self {
        self.max_inference_rounds = rounds.max(1);
        self
    }
}
