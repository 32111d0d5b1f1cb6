//! The depth-class delay table.

use conemap_config::MapperConfig;
use conemap_common::Time;
use serde::{Deserialize, Serialize};

/// Propagation delay per implementation depth class, in nanoseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DelayTable {
    delays: Vec<Time>,
}

impl DelayTable {
    /// Creates a table from delays indexed by depth class.
    pub fn new(delays: Vec<Time>) -> Self {
        Self { delays }
    }

    /// Takes the table from a loaded configuration.
    pub fn from_config(config: &MapperConfig) -> Self {
        Self::new(config.delay.table.clone())
    }

    /// The delay of `depth_class`, if the table has it.
    pub fn get(&self, depth_class: usize) -> Option<Time> {
        self.delays.get(depth_class).copied()
    }

    /// Number of depth classes.
    pub fn len(&self) -> usize {
        self.delays.len()
    }

    /// Returns `true` if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.delays.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_class() {
        let table = DelayTable::new(vec![0.0, 1.2, 2.0]);
        assert_eq!(table.get(1), Some(1.2));
        assert_eq!(table.get(3), None);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn from_config_copies_table() {
        let config =
            conemap_config::load_config_from_str("[delay]\ntable = [0.5, 0.9]\n").unwrap();
        let table = DelayTable::from_config(&config);
        assert_eq!(table.get(0), Some(0.5));
        assert_eq!(table.get(1), Some(0.9));
    }
}
