//! Construction cache.
//!
//! Caches constructed entries per template family so that constructing a
//! template twice with bindings that normalize to the same argument tuple
//! returns the very same entry.
//!
//! A family is keyed by its root template (the declared template every
//! residual in the family derives from). Keys are [`ArgumentKey`]s: one
//! slot per root parameter in declaration order, fingerprinted with xxh64.

use std::hash::{Hash, Hasher};

use genus_core::{GenericArg, TemplateRef, Value};
use rustc_hash::FxHashMap;
use xxhash_rust::xxh64::xxh64;

/// Domain markers for argument encoding.
mod markers {
    pub const UNBOUND: u8 = 0x00;
    pub const PARAM: u8 = 0x01;
    pub const UNDEFINED: u8 = 0x10;
    pub const UNIT: u8 = 0x11;
    pub const NULL: u8 = 0x12;
    pub const BOOL: u8 = 0x13;
    pub const INT: u8 = 0x14;
    pub const FLOAT: u8 = 0x15;
    pub const STR: u8 = 0x16;
    pub const TYPE: u8 = 0x17;
}

fn encode_value(value: &Value, buf: &mut Vec<u8>) {
    match value {
        Value::Undefined => buf.push(markers::UNDEFINED),
        Value::Unit => buf.push(markers::UNIT),
        Value::Null => buf.push(markers::NULL),
        Value::Bool(b) => buf.extend([markers::BOOL, u8::from(*b)]),
        Value::Int(i) => {
            buf.push(markers::INT);
            buf.extend(i.to_le_bytes());
        }
        Value::Float(x) => {
            buf.push(markers::FLOAT);
            buf.extend(x.0.to_bits().to_le_bytes());
        }
        Value::Str(s) => {
            buf.push(markers::STR);
            buf.extend((s.len() as u64).to_le_bytes());
            buf.extend(s.as_bytes());
        }
        Value::Type(ty) => {
            buf.push(markers::TYPE);
            buf.extend(ty.index().to_le_bytes());
        }
    }
}

/// The canonical, order-independent key of one construction.
#[derive(Debug, Clone, Eq)]
pub struct ArgumentKey {
    fingerprint: u64,
    slots: Box<[Option<GenericArg>]>,
}

impl ArgumentKey {
    /// Build a key from per-parameter slots in declaration order.
    pub fn new(slots: Vec<Option<GenericArg>>) -> Self {
        let mut buf = Vec::with_capacity(slots.len() * 6);
        for slot in &slots {
            match slot {
                None => buf.push(markers::UNBOUND),
                Some(GenericArg::Param(param)) => {
                    buf.push(markers::PARAM);
                    buf.extend(param.index().to_le_bytes());
                }
                Some(GenericArg::Value(value)) => encode_value(value, &mut buf),
            }
        }
        Self {
            fingerprint: xxh64(&buf, 0),
            slots: slots.into_boxed_slice(),
        }
    }

    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn slots(&self) -> &[Option<GenericArg>] {
        &self.slots
    }

    /// Number of bound slots.
    pub fn bound_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

impl PartialEq for ArgumentKey {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint && self.slots == other.slots
    }
}

impl Hash for ArgumentKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.fingerprint);
    }
}

/// Cache of constructed entries, one family per root template.
#[derive(Debug, Default, Clone)]
pub struct InstanceCache {
    families: FxHashMap<TemplateRef, FxHashMap<ArgumentKey, TemplateRef>>,
}

impl InstanceCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructed entry.
    pub fn cache_instance(&mut self, root: TemplateRef, key: ArgumentKey, instance: TemplateRef) {
        self.families.entry(root).or_default().insert(key, instance);
    }

    /// Look up a constructed entry.
    pub fn get_instance(&self, root: TemplateRef, key: &ArgumentKey) -> Option<TemplateRef> {
        self.families.get(&root)?.get(key).copied()
    }

    /// Check if an entry was constructed for `key`.
    pub fn has_instance(&self, root: TemplateRef, key: &ArgumentKey) -> bool {
        self.get_instance(root, key).is_some()
    }

    /// Forget a constructed entry, e.g. after its construction failed.
    pub fn remove_instance(&mut self, root: TemplateRef, key: &ArgumentKey) -> Option<TemplateRef> {
        self.families.get_mut(&root)?.remove(key)
    }

    /// Number of entries cached for one family.
    pub fn family_size(&self, root: TemplateRef) -> usize {
        self.families.get(&root).map_or(0, FxHashMap::len)
    }

    /// Number of entries across all families.
    pub fn instance_count(&self) -> usize {
        self.families.values().map(FxHashMap::len).sum()
    }

    pub fn clear(&mut self) {
        self.families.clear();
    }
}
