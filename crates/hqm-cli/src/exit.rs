use hqm_config::ConfigError;
use hqm_md::{FetchError, UniverseError};
use hqm_rank::RankError;

/// Failure class of a run, mapped to a process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Config,
    Network,
    EmptySelection,
    Other,
}

impl FailureKind {
    pub fn code(self) -> u8 {
        match self {
            FailureKind::Other => 1,
            FailureKind::Config => 2,
            FailureKind::Network => 3,
            FailureKind::EmptySelection => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::Config => "config",
            FailureKind::Network => "network",
            FailureKind::EmptySelection => "empty_selection",
            FailureKind::Other => "other",
        }
    }
}

/// First typed cause in the chain wins.
pub fn classify(err: &anyhow::Error) -> FailureKind {
    for cause in err.chain() {
        if cause.downcast_ref::<ConfigError>().is_some()
            || cause.downcast_ref::<UniverseError>().is_some()
        {
            return FailureKind::Config;
        }
        if cause.downcast_ref::<FetchError>().is_some() {
            return FailureKind::Network;
        }
        if let Some(rank) = cause.downcast_ref::<RankError>() {
            return match rank {
                RankError::EmptySelection => FailureKind::EmptySelection,
                RankError::NonPositiveBudget => FailureKind::Config,
                // Bad prices come from upstream data.
                RankError::NonPositivePrice { .. } => FailureKind::Network,
                RankError::Overflow { .. } => FailureKind::Other,
            };
        }
    }
    FailureKind::Other
}
