//! Keys and entities understood by the storage layer

use std::fmt::Debug;
use std::hash::Hash;

use serde::{de::DeserializeOwned, Serialize};

/// A value usable as a storage key
pub trait StorageKey: Clone + Debug + Send + Sync + Eq + Hash {
    /// String form used by key-value backends
    fn as_str(&self) -> &str;
}

/// A record that can be persisted by a [`Storage`](super::Storage) backend
pub trait StorageEntity: Clone + Debug + Send + Sync + Serialize + DeserializeOwned {
    type Key: StorageKey;

    fn key(&self) -> &Self::Key;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    struct SlotKey(String);

    impl StorageKey for SlotKey {
        fn as_str(&self) -> &str {
            &self.0
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Slot {
        key: SlotKey,
        label: String,
    }

    impl StorageEntity for Slot {
        type Key = SlotKey;

        fn key(&self) -> &Self::Key {
            &self.key
        }
    }

    #[test]
    fn test_entity_exposes_string_key() {
        let slot = Slot {
            key: SlotKey("slot-1".to_string()),
            label: "first".to_string(),
        };
        assert_eq!(slot.key().as_str(), "slot-1");
        assert_eq!(slot.label, "first");
    }
}
