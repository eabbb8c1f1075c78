use std::collections::HashMap;

use rand::Rng;

/// Session-stable random sort keys, one per prompt id.
///
/// Values are assigned lazily the first time an id is seen and kept until an
/// explicit reshuffle, so re-renders never reorder the random view.
#[derive(Debug, Clone, Default)]
pub struct RandomOrder {
    values: HashMap<String, f64>,
}

impl RandomOrder {
    pub fn ensure<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        self.ensure_with(ids, &mut rand::thread_rng());
    }

    fn ensure_with<'a, R: Rng>(
        &mut self,
        ids: impl IntoIterator<Item = &'a str>,
        rng: &mut R,
    ) {
        for id in ids {
            if !self.values.contains_key(id) {
                self.values.insert(id.to_string(), rng.gen::<f64>());
            }
        }
    }

    /// Drops every key and draws fresh ones for `ids`.
    pub fn reshuffle<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        self.values.clear();
        self.ensure(ids);
    }

    pub fn value(&self, id: &str) -> Option<f64> {
        self.values.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}
