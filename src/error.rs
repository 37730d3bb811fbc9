use std::path::PathBuf;

use crate::fsm::GhostStateId;

/// Misuse of a ghost's state registry.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GhostError {
    #[error("state {0:?} is already registered")]
    DuplicateState(GhostStateId),

    #[error("state object {state:?} registered under slot {slot:?}")]
    MismatchedState {
        slot: GhostStateId,
        state: GhostStateId,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
