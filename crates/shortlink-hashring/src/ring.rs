use std::collections::BTreeMap;

use crate::error::{HashRingError, Result};
use crate::machine::Machine;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualNode {
    pub machine: Machine,
    pub replica: u32,
}

impl VirtualNode {
    pub fn new(machine: Machine, replica: u32) -> Self {
        Self { machine, replica }
    }
}

/// Virtual nodes ordered by ring key.
#[derive(Debug, Clone, Default)]
pub struct Ring {
    entries: BTreeMap<u32, VirtualNode>,
}

impl Ring {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `vnode` at `key` unless the key is already taken. An occupied
    /// key is left untouched and `false` is returned.
    pub fn insert(&mut self, key: u32, vnode: VirtualNode) -> bool {
        match self.entries.entry(key) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(vnode);
                true
            }
        }
    }

    pub fn remove(&mut self, key: u32) -> Option<VirtualNode> {
        self.entries.remove(&key)
    }

    /// Returns the virtual node at the smallest key `>= key`, wrapping to
    /// the smallest key on the ring when nothing lies at or above `key`.
    pub fn lookup(&self, key: u32) -> Result<&VirtualNode> {
        self.entries
            .range(key..)
            .next()
            .or_else(|| self.entries.iter().next())
            .map(|(_, vnode)| vnode)
            .ok_or(HashRingError::EmptyRing(key))
    }

    pub fn contains_key(&self, key: u32) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &VirtualNode)> {
        self.entries.iter().map(|(key, vnode)| (*key, vnode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vnode(host: &str, replica: u32) -> VirtualNode {
        VirtualNode::new(Machine::new(host, 8080), replica)
    }

    fn sample_ring() -> Ring {
        let mut ring = Ring::new();
        assert!(ring.insert(10, vnode("a", 0)));
        assert!(ring.insert(50, vnode("b", 0)));
        assert!(ring.insert(90, vnode("c", 0)));
        ring
    }

    #[test]
    fn test_lookup_successor() {
        let ring = sample_ring();
        assert_eq!(ring.lookup(11).unwrap().machine.host(), "b");
        assert_eq!(ring.lookup(50).unwrap().machine.host(), "b");
        assert_eq!(ring.lookup(51).unwrap().machine.host(), "c");
        assert_eq!(ring.lookup(0).unwrap().machine.host(), "a");
    }

    #[test]
    fn test_lookup_exact_key() {
        let ring = sample_ring();
        assert_eq!(ring.lookup(10).unwrap().machine.host(), "a");
        assert_eq!(ring.lookup(90).unwrap().machine.host(), "c");
    }

    #[test]
    fn test_lookup_wraps_around() {
        let ring = sample_ring();
        assert_eq!(ring.lookup(91).unwrap().machine.host(), "a");
        assert_eq!(ring.lookup(u32::MAX).unwrap().machine.host(), "a");
    }

    #[test]
    fn test_lookup_key_at_max() {
        let mut ring = sample_ring();
        ring.insert(u32::MAX, vnode("d", 0));
        assert_eq!(ring.lookup(u32::MAX).unwrap().machine.host(), "d");
        assert_eq!(ring.lookup(91).unwrap().machine.host(), "d");
    }

    #[test]
    fn test_lookup_empty() {
        let ring = Ring::new();
        assert_eq!(ring.lookup(7), Err(HashRingError::EmptyRing(7)));
    }

    #[test]
    fn test_insert_occupied_key_is_rejected() {
        let mut ring = sample_ring();
        assert!(!ring.insert(50, vnode("z", 3)));
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.lookup(50).unwrap(), &vnode("b", 0));
    }

    #[test]
    fn test_remove() {
        let mut ring = sample_ring();
        assert_eq!(ring.remove(50), Some(vnode("b", 0)));
        assert_eq!(ring.remove(50), None);
        assert!(!ring.contains_key(50));
        assert_eq!(ring.lookup(11).unwrap().machine.host(), "c");

        ring.remove(10);
        ring.remove(90);
        assert!(ring.is_empty());
    }

    #[test]
    fn test_iter_in_key_order() {
        let ring = sample_ring();
        let keys: Vec<u32> = ring.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec![10, 50, 90]);
    }
}
