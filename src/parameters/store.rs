use std::{collections::HashMap, sync::Arc};

use crate::{
    parameters::{Loaded, Sources},
    prelude::*,
};

/// Loads every distinct set of sources once and hands out the same immutable result afterwards.
#[derive(Default)]
pub struct ParameterStore {
    memo: HashMap<Sources, Arc<Loaded>>,
}

impl ParameterStore {
    pub fn get_or_load(&mut self, sources: &Sources) -> Arc<Loaded> {
        if let Some(loaded) = self.memo.get(sources) {
            debug!(?sources, "reusing the loaded parameters");
            return Arc::clone(loaded);
        }
        let loaded = Arc::new(Loaded::load(sources));
        self.memo.insert(sources.clone(), Arc::clone(&loaded));
        loaded
    }
}
