use log::info;

use crate::error::Result;
use crate::models::{FindSpec, FindSpecCollection, TypeIndicator};
use crate::store::KnowledgeStore;

/// Owns the find specification collection of one compilation pass.
#[derive(Debug, Default)]
pub struct FindSpecAggregator {
    collection: FindSpecCollection,
}

impl FindSpecAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the bucket for `type_indicator`, creating it on first use.
    pub fn append(&mut self, type_indicator: TypeIndicator, spec: FindSpec) {
        self.collection.append(type_indicator, spec);
    }

    pub fn collection(&self) -> &FindSpecCollection {
        &self.collection
    }

    pub fn into_collection(self) -> FindSpecCollection {
        self.collection
    }

    /// Hand the completed collection to `store` under `key`.
    ///
    /// A value stored by an earlier pass is replaced, never merged.
    pub fn publish(&self, store: &mut dyn KnowledgeStore, key: &str) -> Result<()> {
        store.set_find_specs(key, self.collection.clone())?;
        info!(
            "Published {} find specifications under {}",
            self.collection.len(),
            key
        );
        Ok(())
    }
}
