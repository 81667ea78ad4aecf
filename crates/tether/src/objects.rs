use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

const FNV_OFFSET: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;
const ANONYMOUS_SALT: &[u8] = b"CFSxSLuP";
const ANONYMOUS_NAME: &str = "unnamed";

const fn fnv1a(hash: u32, bytes: &[u8]) -> u32 {
    let mut hash = hash;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u32;
        hash = hash.wrapping_mul(FNV_PRIME);
        i += 1;
    }
    hash
}

/// Stable 32-bit identity of a simulated object, derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(u32);

impl ObjectId {
    pub const fn from_name(name: &str) -> Self {
        Self(fnv1a(FNV_OFFSET, name.as_bytes()))
    }

    pub const fn from_raw(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

/// Maps ids back to the names they were made from, for logs and debugging.
#[derive(Debug, Default, Clone)]
pub struct ObjectRegistry {
    names: HashMap<ObjectId, String>,
    anonymous_count: u64,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hashes `name` and remembers it. A collision with a different name is
    /// logged and the first name is kept.
    pub fn register(&mut self, name: &str) -> ObjectId {
        let id = ObjectId::from_name(name);
        self.insert(id, name);
        id
    }

    /// A fresh id for an object nobody will look up by name.
    pub fn anonymous(&mut self) -> ObjectId {
        let hash = fnv1a(FNV_OFFSET, ANONYMOUS_NAME.as_bytes());
        let hash = fnv1a(hash, ANONYMOUS_SALT);
        let id = ObjectId(fnv1a(hash, &self.anonymous_count.to_le_bytes()));
        self.anonymous_count += 1;
        self.insert(id, ANONYMOUS_NAME);
        id
    }

    fn insert(&mut self, id: ObjectId, name: &str) {
        match self.names.get(&id) {
            Some(existing) if existing != name || name == ANONYMOUS_NAME => {
                log::warn!("object id collision on {id}: existing {existing:?}, new {name:?}");
            }
            Some(_) => {}
            None => {
                self.names.insert(id, name.to_owned());
            }
        }
    }

    pub fn name(&self, id: ObjectId) -> &str {
        self.names.get(&id).map_or("unknown", String::as_str)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.names.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv1a_reference_values() {
        assert_eq!(ObjectId::from_name("").value(), 0x811c_9dc5);
        assert_eq!(ObjectId::from_name("a").value(), 0xe40c_292c);
        assert_eq!(ObjectId::from_name("foobar").value(), 0xbf9c_f968);
    }

    #[test]
    fn ids_are_const() {
        const PLAYER: ObjectId = ObjectId::from_name("player");
        assert_eq!(PLAYER, ObjectId::from_name("player"));
        assert_ne!(PLAYER, ObjectId::from_name("ground"));
    }

    #[test]
    fn registry_resolves_names() {
        let mut registry = ObjectRegistry::new();
        let player = registry.register("player");
        let ground = registry.register("ground");

        assert_eq!(registry.name(player), "player");
        assert_eq!(registry.name(ground), "ground");
        assert_eq!(registry.name(ObjectId::from_raw(7)), "unknown");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn registering_twice_keeps_one_entry() {
        let mut registry = ObjectRegistry::new();
        let a = registry.register("player");
        let b = registry.register("player");
        assert_eq!(a, b);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn anonymous_ids_are_distinct() {
        let mut registry = ObjectRegistry::new();
        let ids: Vec<_> = (0..256).map(|_| registry.anonymous()).collect();

        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), ids.len());
        assert!(ids.iter().all(|&id| registry.name(id) == "unnamed"));
    }

    #[test]
    fn separate_registries_do_not_share_names() {
        let mut first = ObjectRegistry::new();
        let id = first.register("crate");
        let second = ObjectRegistry::new();
        assert_eq!(second.name(id), "unknown");
        assert!(!second.contains(id));
    }
}
