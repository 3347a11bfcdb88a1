//! Per-entity property bag with counter and proc-threshold semantics.
//!
//! A [PropertyBag] is a string-keyed store of small scalar values owned by a
//! single entity (a player record, a creature, an account). Its main customer
//! is "every Nth occurrence triggers an effect" bookkeeping: call
//! [PropertyBag::increment_or_proc] on each occurrence and act when it
//! reports the proc; the counter resets to absent, not to zero, so the next
//! occurrence starts a fresh cycle.
//!
//! The value space is a closed set of kinds ([PropValue]) rather than a
//! type-erased any-map. Reading a key with a different type than it was
//! written with is a caller bug: debug builds assert, release builds hand
//! back the supplied default.
//!
//! Not synchronized. The owning entity's update path is the single writer.

use std::collections::HashMap;

/// The closed set of value kinds a [PropertyBag] can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    /// Unsigned counter, the kind [PropertyBag::increment] operates on.
    Counter(u32),
    Int(i64),
    Flag(bool),
    Text(String),
}

impl From<u32> for PropValue {
    fn from(v: u32) -> Self {
        PropValue::Counter(v)
    }
}

impl From<i64> for PropValue {
    fn from(v: i64) -> Self {
        PropValue::Int(v)
    }
}

impl From<bool> for PropValue {
    fn from(v: bool) -> Self {
        PropValue::Flag(v)
    }
}

impl From<String> for PropValue {
    fn from(v: String) -> Self {
        PropValue::Text(v)
    }
}

impl From<&str> for PropValue {
    fn from(v: &str) -> Self {
        PropValue::Text(v.to_string())
    }
}

/// Extraction half of the closed value set; implemented only for the kinds
/// in [PropValue].
pub trait FromProp: Sized {
    fn from_prop(value: &PropValue) -> Option<Self>;
}

impl FromProp for u32 {
    fn from_prop(value: &PropValue) -> Option<Self> {
        match value {
            PropValue::Counter(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromProp for i64 {
    fn from_prop(value: &PropValue) -> Option<Self> {
        match value {
            PropValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromProp for bool {
    fn from_prop(value: &PropValue) -> Option<Self> {
        match value {
            PropValue::Flag(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromProp for String {
    fn from_prop(value: &PropValue) -> Option<Self> {
        match value {
            PropValue::Text(v) => Some(v.clone()),
            _ => None,
        }
    }
}

/// String-keyed scalar store with increment / proc-threshold operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyBag {
    values: HashMap<String, PropValue>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `key`. Overwriting with a different value kind is
    /// a caller bug; the bag does not coerce.
    pub fn set(&mut self, key: &str, value: impl Into<PropValue>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Stored value for `key` if present and of the requested kind, else
    /// `default`. Never errors on a missing key.
    pub fn get<T: FromProp>(&self, key: &str, default: T) -> T {
        match self.values.get(key) {
            Some(stored) => match T::from_prop(stored) {
                Some(v) => v,
                None => {
                    debug_assert!(false, "property {key:?} read with mismatched type");
                    default
                }
            },
            None => default,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }

    /// Add `by` to the counter at `key` (absent reads as 0) and return the
    /// new value. Saturates at `u32::MAX` rather than wrapping.
    pub fn increment(&mut self, key: &str, by: u32) -> u32 {
        let next = self.get::<u32>(key, 0).saturating_add(by);
        self.set(key, next);
        next
    }

    /// Increment the counter at `key`; when the new value reaches `max` the
    /// key is removed and `true` is returned - the proc fired and the counter
    /// is back to absent. Otherwise the incremented value stays stored and
    /// the result is `false`.
    pub fn increment_or_proc(&mut self, key: &str, max: u32, by: u32) -> bool {
        let next = self.increment(key, by);
        if next < max {
            return false;
        }
        self.remove(key);
        true
    }
}
