//! Reconstructs per-hour field sets from an unordered observation stream.
//!
//! Each delivery batch gets its own [`GroupTable`]: observations are merged
//! by group key, the table is handed to the record builder and then dropped.
//! Nothing carries over between batches.

use crate::observation::{DeliveryBatch, RawObservation};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Merged field set for one group key.
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulator {
    pub key: String,
    /// `time` of the first observation seen for this key.
    pub time: Option<String>,
    /// `group` of the first observation seen for this key.
    pub group: Option<String>,
    /// Shallow merge of every observation's metadata, later keys win.
    pub metadata: Map<String, Value>,
    /// Variable name to last delivered value.
    pub values: HashMap<String, f64>,
    /// Number of observations folded into this accumulator.
    pub observations: usize,
}

impl Accumulator {
    fn seed(key: String, observation: &RawObservation) -> Self {
        Self {
            key,
            time: observation.time.clone(),
            group: observation.group.clone(),
            metadata: observation.metadata.clone().unwrap_or_default(),
            values: HashMap::new(),
            observations: 0,
        }
    }

    /// Fold one observation into the group.
    ///
    /// A later value for the same variable replaces the earlier one. An
    /// observation without a value is skipped, so the earlier value survives
    /// instead of the field falling back to its default.
    fn absorb(&mut self, observation: &RawObservation) {
        if let Some(value) = observation.value {
            self.values.insert(observation.variable.clone(), value);
        }
        if let Some(metadata) = &observation.metadata {
            for (k, v) in metadata {
                self.metadata.insert(k.clone(), v.clone());
            }
        }
        self.observations += 1;
    }

    pub fn value(&self, variable: &str) -> Option<f64> {
        self.values.get(variable).copied()
    }

    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }

    pub fn metadata_f64(&self, key: &str) -> Option<f64> {
        self.metadata.get(key).and_then(Value::as_f64)
    }
}

/// Group key to accumulator table for a single batch, in first-seen order.
#[derive(Debug, Default)]
pub struct GroupTable {
    index: HashMap<String, usize>,
    groups: Vec<Accumulator>,
}

impl GroupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one observation into the table.
    pub fn insert(&mut self, observation: &RawObservation, now: &DateTime<Utc>) {
        let key = observation.group_key(now);
        let slot = match self.index.get(&key).copied() {
            Some(slot) => slot,
            None => {
                let slot = self.groups.len();
                self.groups.push(Accumulator::seed(key.clone(), observation));
                self.index.insert(key, slot);
                slot
            }
        };
        self.groups[slot].absorb(observation);
    }

    pub fn get(&self, key: &str) -> Option<&Accumulator> {
        self.index.get(key).map(|slot| &self.groups[*slot])
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn into_groups(self) -> Vec<Accumulator> {
        self.groups
    }
}

/// Merge one delivery batch into a fresh group table.
pub fn normalize_batch(batch: &DeliveryBatch, now: &DateTime<Utc>) -> GroupTable {
    let mut table = GroupTable::new();
    for observation in &batch.result {
        table.insert(observation, now);
    }
    log::debug!(
        "[WFD] normalizer: merged {} observations into {} groups",
        batch.result.len(),
        table.len()
    );
    table
}
