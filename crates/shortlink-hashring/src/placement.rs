use sha2::{Digest, Sha256};

use crate::machine::Machine;

/// Rehash attempts before falling back to probing the next free key.
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 8;

/// Derives ring keys for a machine's virtual nodes.
///
/// Implementations must be deterministic: the same `(machine, replica, attempt)`
/// always yields the same key. `attempt` is bumped by the hasher when the
/// previous key is already taken on the ring.
pub trait Placement: Send + Sync + std::fmt::Debug {
    fn position(&self, machine: &Machine, replica: u32, attempt: u32) -> u32;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sha256Placement {
    seed: u64,
}

impl Sha256Placement {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Placement for Sha256Placement {
    fn position(&self, machine: &Machine, replica: u32, attempt: u32) -> u32 {
        let mut hasher = Sha256::new();
        hasher.update(self.seed.to_le_bytes());
        hasher.update(machine.endpoint().as_bytes());
        hasher.update(replica.to_le_bytes());
        hasher.update(attempt.to_le_bytes());
        let result = hasher.finalize();
        let bytes: [u8; 4] = result[..4].try_into().unwrap_or([0u8; 4]);
        u32::from_le_bytes(bytes)
    }
}
