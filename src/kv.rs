//! Key/value debug data attached to error nodes.
//!
//! Data is stored in a [`KvPairs`] map from string keys to [`Value`]s. A
//! [`Value`] is a cheaply cloneable, type-erased handle to any
//! `Debug + Send + Sync + 'static` value, so merging the data of a whole chain
//! (see [`Annotated::get_all_data`](crate::Annotated::get_all_data)) never
//! copies the values themselves.
//!
//! Keys starting with [`RESERVED_KEY_PREFIX`] are reserved and can never be
//! set or looked up through the public API.

use alloc::string::String;
use core::{
    any::{Any, TypeId},
    fmt,
};

use indexmap::IndexMap;
use triomphe::Arc;
use unsize::CoerceUnsize;

use crate::hooks;

/// The marker byte that makes a key reserved.
pub const RESERVED_KEY_PREFIX: u8 = b'_';

/// Returns `true` if `key` is reserved for internal use.
///
/// # Examples
///
/// ```
/// use errnote::kv::is_reserved_key;
///
/// assert!(is_reserved_key("_msg"));
/// assert!(!is_reserved_key("msg_"));
/// assert!(!is_reserved_key(""));
/// ```
#[inline]
pub fn is_reserved_key(key: &str) -> bool {
    key.as_bytes().first() == Some(&RESERVED_KEY_PREFIX)
}

/// Values that can be stored as error data.
///
/// This is implemented for every `Debug + Send + Sync + 'static` type.
pub trait DataValue: Any + fmt::Debug + Send + Sync {}

impl<T> DataValue for T where T: Any + fmt::Debug + Send + Sync {}

/// A shared, type-erased data value.
///
/// `Display` renders strings as-is and everything else with its `Debug`
/// implementation, unless a value formatter has been installed for the type
/// through [`Hooks::value_formatter`](crate::hooks::Hooks::value_formatter).
#[derive(Clone)]
pub struct Value(Arc<dyn DataValue>);

impl Value {
    /// Wraps a value.
    ///
    /// # Examples
    ///
    /// ```
    /// use errnote::Value;
    ///
    /// let value = Value::new(144);
    /// assert_eq!(value.downcast_ref::<i32>(), Some(&144));
    /// assert_eq!(value.to_string(), "144");
    /// ```
    pub fn new<T: DataValue>(value: T) -> Self {
        Self(Arc::new(value).unsize(unsize::Coercion!(to dyn DataValue)))
    }

    /// Returns the [`TypeId`] of the wrapped value.
    pub fn type_id(&self) -> TypeId {
        self.as_any().type_id()
    }

    /// Returns `true` if the wrapped value is of type `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Returns a reference to the wrapped value if it is of type `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use errnote::Value;
    ///
    /// let value = Value::new("quark");
    /// assert_eq!(value.downcast_ref::<&str>(), Some(&"quark"));
    /// assert_eq!(value.downcast_ref::<String>(), None);
    /// ```
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Returns `true` if both handles point to the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn as_any(&self) -> &dyn Any {
        let value: &dyn DataValue = &*self.0;
        value
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(result) = hooks::format_value(self.as_any(), f) {
            return result;
        }

        let any = self.as_any();
        if let Some(s) = any.downcast_ref::<&'static str>() {
            f.write_str(s)
        } else if let Some(s) = any.downcast_ref::<String>() {
            f.write_str(s)
        } else if let Some(s) = any.downcast_ref::<alloc::borrow::Cow<'static, str>>() {
            f.write_str(s)
        } else {
            fmt::Debug::fmt(&*self.0, f)
        }
    }
}

type Map = IndexMap<String, Value, rustc_hash::FxBuildHasher>;

/// An insertion-ordered map of error data.
///
/// Insertion order does not matter for lookups; it only determines the order
/// pairs are displayed in. Re-inserting an existing key keeps its original
/// position and replaces the value.
///
/// # Examples
///
/// ```
/// use errnote::{KvPairs, Value};
///
/// let mut pairs = KvPairs::new();
/// pairs.insert("magic", Value::new(144));
/// pairs.insert("charm", Value::new("quark"));
/// assert_eq!(pairs.to_string(), "{magic:144, charm:quark}");
/// ```
#[derive(Clone, Default)]
pub struct KvPairs(Map);

impl KvPairs {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self(Map::default())
    }

    /// Inserts a pair, returning the previous value for the key if any.
    ///
    /// This does not check for reserved keys; the node operations that
    /// accept a [`KvPairs`] skip them.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Returns the value stored for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns `true` if the map contains `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Removes a key, preserving the order of the remaining pairs.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    /// Returns the number of pairs.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map holds no pairs.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the pairs in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over the keys in insertion order.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Copies every pair of `other` into `self`; `other` wins on collisions.
    ///
    /// # Examples
    ///
    /// ```
    /// use errnote::kv;
    ///
    /// let mut deep = kv! { "deep" => 1, "dup" => 1 };
    /// deep.overlay(&kv! { "dup" => 2, "shallow" => 2 });
    /// assert_eq!(deep.to_string(), "{deep:1, dup:2, shallow:2}");
    /// ```
    pub fn overlay(&mut self, other: &KvPairs) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Copies the non-reserved pairs of `other` into `self`.
    pub(crate) fn overlay_public(&mut self, other: &KvPairs) {
        for (key, value) in &other.0 {
            if !is_reserved_key(key) {
                self.0.insert(key.clone(), value.clone());
            }
        }
    }
}

impl fmt::Debug for KvPairs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

impl fmt::Display for KvPairs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (index, (key, value)) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}:{value}")?;
        }
        f.write_str("}")
    }
}

impl<K, V> FromIterator<(K, V)> for KvPairs
where
    K: Into<String>,
    V: DataValue,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), Value::new(value)))
                .collect(),
        )
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for KvPairs
where
    K: Into<String>,
    V: DataValue,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl IntoIterator for KvPairs {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a KvPairs {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
