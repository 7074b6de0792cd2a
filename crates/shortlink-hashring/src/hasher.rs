use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::config::HasherConfig;
use crate::error::{HashRingError, Result};
use crate::machine::Machine;
use crate::placement::{Placement, Sha256Placement, MAX_PLACEMENT_ATTEMPTS};
use crate::ring::{Ring, VirtualNode};

#[derive(Debug, Clone)]
struct HasherState {
    ring: Ring,
    registry: HashMap<Machine, Vec<u32>>,
    version: u64,
}

impl HasherState {
    fn new() -> Self {
        Self {
            ring: Ring::new(),
            registry: HashMap::new(),
            version: 0,
        }
    }
}

/// Routes 32-bit keys to machines through a ring of virtual nodes.
///
/// Every operation takes the state lock for its whole duration, so readers
/// always see either all or none of a machine's virtual nodes.
#[derive(Debug)]
pub struct ConsistentHasher {
    state: RwLock<HasherState>,
    virtual_nodes: u32,
    placement: Arc<dyn Placement>,
}

impl ConsistentHasher {
    /// Builds a hasher with the default configuration. Duplicate machines in
    /// `machines` are skipped.
    pub fn new(machines: impl IntoIterator<Item = Machine>) -> Self {
        let config = HasherConfig::default();
        let placement = Arc::new(Sha256Placement::new(config.seed));
        let hasher = Self::empty(config.virtual_nodes, placement);
        hasher.populate(machines);
        hasher
    }

    pub fn with_config(
        machines: impl IntoIterator<Item = Machine>,
        config: HasherConfig,
    ) -> Result<Self> {
        let placement = Arc::new(Sha256Placement::new(config.seed));
        Self::with_placement(machines, config, placement)
    }

    /// Like [`ConsistentHasher::with_config`] but with a caller-supplied key
    /// derivation. `config.seed` is ignored.
    pub fn with_placement(
        machines: impl IntoIterator<Item = Machine>,
        config: HasherConfig,
        placement: Arc<dyn Placement>,
    ) -> Result<Self> {
        config.validate()?;
        let hasher = Self::empty(config.virtual_nodes, placement);
        hasher.populate(machines);
        Ok(hasher)
    }

    fn empty(virtual_nodes: u32, placement: Arc<dyn Placement>) -> Self {
        Self {
            state: RwLock::new(HasherState::new()),
            virtual_nodes,
            placement,
        }
    }

    fn populate(&self, machines: impl IntoIterator<Item = Machine>) {
        let mut state = self.state.write();
        for machine in machines {
            if state.registry.contains_key(&machine) {
                warn!(machine = %machine, "Skipping duplicate machine in initial list");
                continue;
            }
            self.place(&mut state, machine);
        }
        debug!(
            machines = state.registry.len(),
            virtual_nodes = state.ring.len(),
            "Hasher initialized"
        );
    }

    fn place(&self, state: &mut HasherState, machine: Machine) {
        let mut positions = Vec::with_capacity(self.virtual_nodes as usize);
        for replica in 0..self.virtual_nodes {
            let key = self.free_position(&state.ring, &machine, replica);
            state
                .ring
                .insert(key, VirtualNode::new(machine.clone(), replica));
            positions.push(key);
        }
        state.registry.insert(machine, positions);
    }

    fn free_position(&self, ring: &Ring, machine: &Machine, replica: u32) -> u32 {
        for attempt in 0..MAX_PLACEMENT_ATTEMPTS {
            let key = self.placement.position(machine, replica, attempt);
            if !ring.contains_key(key) {
                return key;
            }
            debug!(
                machine = %machine,
                replica,
                attempt,
                key,
                "Virtual node key collision, rehashing"
            );
        }

        let mut key = self
            .placement
            .position(machine, replica, MAX_PLACEMENT_ATTEMPTS);
        while ring.contains_key(key) {
            key = key.wrapping_add(1);
        }
        key
    }

    pub fn add_server(&self, machine: Machine) -> Result<()> {
        let mut state = self.state.write();
        if state.registry.contains_key(&machine) {
            return Err(HashRingError::DuplicateMachine(machine));
        }

        info!(
            machine = %machine,
            virtual_nodes = self.virtual_nodes,
            "Adding machine to ring"
        );
        self.place(&mut state, machine);
        state.version = state.version.wrapping_add(1);
        Ok(())
    }

    pub fn remove_server(&self, machine: &Machine) -> Result<()> {
        let mut state = self.state.write();
        let positions = state
            .registry
            .remove(machine)
            .ok_or_else(|| HashRingError::UnknownMachine(machine.clone()))?;

        for key in &positions {
            state.ring.remove(*key);
        }
        state.version = state.version.wrapping_add(1);
        info!(
            machine = %machine,
            virtual_nodes = positions.len(),
            remaining = state.registry.len(),
            "Removed machine from ring"
        );
        Ok(())
    }

    pub fn get_server(&self, key: u32) -> Result<Machine> {
        let state = self.state.read();
        state.ring.lookup(key).map(|vnode| vnode.machine.clone())
    }

    pub fn get_virtual_node(&self, key: u32) -> Result<VirtualNode> {
        self.state.read().ring.lookup(key).cloned()
    }

    pub fn contains(&self, machine: &Machine) -> bool {
        self.state.read().registry.contains_key(machine)
    }

    pub fn machines(&self) -> Vec<Machine> {
        let mut machines: Vec<Machine> = self.state.read().registry.keys().cloned().collect();
        machines.sort();
        machines
    }

    pub fn machine_count(&self) -> usize {
        self.state.read().registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().registry.is_empty()
    }

    /// Number of virtual nodes currently on the ring.
    pub fn ring_len(&self) -> usize {
        self.state.read().ring.len()
    }

    pub fn virtual_nodes(&self) -> u32 {
        self.virtual_nodes
    }

    pub fn positions(&self, machine: &Machine) -> Option<Vec<u32>> {
        self.state.read().registry.get(machine).cloned()
    }

    pub fn ring_entries(&self) -> Vec<(u32, Machine)> {
        self.state
            .read()
            .ring
            .iter()
            .map(|(key, vnode)| (key, vnode.machine.clone()))
            .collect()
    }

    pub fn version(&self) -> u64 {
        self.state.read().version
    }
}

impl Clone for ConsistentHasher {
    fn clone(&self) -> Self {
        let state_guard = self.state.read();

        Self {
            state: RwLock::new(state_guard.clone()),
            virtual_nodes: self.virtual_nodes,
            placement: Arc::clone(&self.placement),
        }
    }
}
