use std::sync::Arc;

use crate::config::HasherConfig;
use crate::error::{HashRingError, Result};
use crate::hasher::ConsistentHasher;
use crate::machine::Machine;
use crate::placement::Placement;

pub struct HasherBuilder {
    config: HasherConfig,
    placement: Option<Arc<dyn Placement>>,
    machines: Vec<Machine>,
}

impl HasherBuilder {
    pub fn new() -> Self {
        Self {
            config: HasherConfig::default(),
            placement: None,
            machines: Vec::new(),
        }
    }

    pub fn config(mut self, config: HasherConfig) -> Self {
        self.config = config;
        self
    }

    pub fn virtual_nodes(mut self, count: u32) -> Self {
        self.config.virtual_nodes = count;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn placement(mut self, placement: Arc<dyn Placement>) -> Self {
        self.placement = Some(placement);
        self
    }

    pub fn add_machine(mut self, machine: Machine) -> Self {
        self.machines.push(machine);
        self
    }

    pub fn machines(mut self, machines: impl IntoIterator<Item = Machine>) -> Self {
        self.machines.extend(machines);
        self
    }

    pub fn build(self) -> Result<ConsistentHasher> {
        for (i, machine) in self.machines.iter().enumerate() {
            if self.machines[..i].contains(machine) {
                return Err(HashRingError::DuplicateMachine(machine.clone()));
            }
        }

        match self.placement {
            Some(placement) => {
                ConsistentHasher::with_placement(self.machines, self.config, placement)
            }
            None => ConsistentHasher::with_config(self.machines, self.config),
        }
    }
}

impl Default for HasherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
