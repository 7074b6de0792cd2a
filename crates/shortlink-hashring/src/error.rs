use thiserror::Error;

use crate::machine::Machine;

pub type Result<T> = std::result::Result<T, HashRingError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HashRingError {
    #[error("ring is empty, no machine for key {0}")]
    EmptyRing(u32),

    #[error("machine already registered: {0}")]
    DuplicateMachine(Machine),

    #[error("machine not registered: {0}")]
    UnknownMachine(Machine),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid machine address: {0}")]
    InvalidMachine(String),
}

impl HashRingError {
    /// An empty ring can start serving again once a machine registers.
    pub fn is_retryable(&self) -> bool {
        matches!(self, HashRingError::EmptyRing(_))
    }
}
