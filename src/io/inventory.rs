// src/io/inventory.rs

use crate::error::EngineResult;
use crate::model::records::GroupKey;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// Seed of the bootstrap placeholder, so repeated runs see the same stock.
pub const PLACEHOLDER_SEED: u64 = 42;
/// Placeholder on-hand range, upper bound exclusive.
pub const PLACEHOLDER_RANGE: std::ops::Range<u32> = 100..400;

#[derive(Debug, Deserialize)]
struct InventoryRow {
    sku: String,
    channel: String,
    inventory_on_hand: u32,
}

/// On-hand inventory per group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryFeed {
    levels: HashMap<GroupKey, u32>,
}

impl InventoryFeed {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (GroupKey, u32)>) -> Self {
        Self {
            levels: pairs.into_iter().collect(),
        }
    }

    /// Reads a `sku,channel,inventory_on_hand` CSV feed.
    pub fn from_csv(path: &Path) -> EngineResult<Self> {
        let mut rdr = csv::Reader::from_path(path)?;
        let mut levels = HashMap::new();
        for row in rdr.deserialize() {
            let row: InventoryRow = row?;
            let key = GroupKey::new(row.sku, row.channel);
            if levels.insert(key.clone(), row.inventory_on_hand).is_some() {
                warn!(group = %key, "duplicate inventory row, keeping the last one");
            }
        }
        info!(groups = levels.len(), path = %path.display(), "loaded inventory feed");
        Ok(Self { levels })
    }

    /// Bootstrap stand-in for a live inventory feed.
    ///
    /// Draws uniform levels from a seeded generator in key order, so the
    /// result depends only on the set of keys. Not a business source of truth.
    pub fn placeholder<'a>(keys: impl IntoIterator<Item = &'a GroupKey>) -> Self {
        let mut keys: Vec<&GroupKey> = keys.into_iter().collect();
        keys.sort();
        keys.dedup();

        let mut rng = StdRng::seed_from_u64(PLACEHOLDER_SEED);
        let levels: HashMap<GroupKey, u32> = keys
            .into_iter()
            .map(|key| (key.clone(), rng.gen_range(PLACEHOLDER_RANGE)))
            .collect();

        warn!(
            groups = levels.len(),
            "using placeholder inventory levels; connect a real inventory feed for production use"
        );
        Self { levels }
    }

    pub fn on_hand(&self, key: &GroupKey) -> Option<u32> {
        self.levels.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
