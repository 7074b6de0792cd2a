mod builder;
mod config;
mod error;
mod hasher;
mod machine;
mod placement;
mod ring;

pub use builder::HasherBuilder;
pub use config::{HasherConfig, DEFAULT_VIRTUAL_NODES};
pub use error::{HashRingError, Result};
pub use hasher::ConsistentHasher;
pub use machine::Machine;
pub use placement::{Placement, Sha256Placement, MAX_PLACEMENT_ATTEMPTS};
pub use ring::{Ring, VirtualNode};
