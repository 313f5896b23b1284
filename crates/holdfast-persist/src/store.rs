use std::collections::HashMap;

/// Contract for the external key-value store holding the one fact that
/// survives chunk regeneration. Last-write-wins is sufficient: each key is
/// owned by exactly one chunk at a time.
pub trait FlagStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory store used by tests and the bench runner. Production drivers
/// supply their own backing (browser storage, save file, ...).
#[derive(Debug, Default)]
pub struct MemoryFlagStore {
    entries: HashMap<String, String>,
}

impl MemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FlagStore for MemoryFlagStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), value.to_owned());
    }
}
