use std::collections::HashMap;

/// Identifiers minted for one table, in minting order.
///
/// Later tables may only reference ids that are already in a pool, which is
/// what keeps the five outputs referentially consistent.
#[derive(Debug, Clone, Default)]
pub struct IdPool {
    ids: Vec<String>,
    positions: HashMap<String, usize>,
}

impl IdPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly minted id. Returns `false` if the id was already minted.
    pub fn mint(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.positions.contains_key(&id) {
            return false;
        }
        self.positions.insert(id.clone(), self.ids.len());
        self.ids.push(id);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Minting position of `id`, zero-based.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.ids
    }
}

impl FromIterator<String> for IdPool {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut pool = IdPool::new();
        for id in iter {
            pool.mint(id);
        }
        pool
    }
}

/// Format a 1-based sequence number the way every table's ids are written.
pub fn sequence_id(prefix: &str, ordinal: usize) -> String {
    format!("{prefix}{ordinal:03}")
}
