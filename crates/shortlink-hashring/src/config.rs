use serde::{Deserialize, Serialize};

use crate::error::{HashRingError, Result};

pub const DEFAULT_VIRTUAL_NODES: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HasherConfig {
    /// Virtual nodes placed on the ring for each machine.
    pub virtual_nodes: u32,
    /// Seed mixed into virtual-node key derivation.
    pub seed: u64,
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            virtual_nodes: DEFAULT_VIRTUAL_NODES,
            seed: 0,
        }
    }
}

impl HasherConfig {
    pub fn validate(&self) -> Result<()> {
        if self.virtual_nodes == 0 {
            return Err(HashRingError::InvalidConfig(
                "virtual_nodes must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
