//! Custom `Display` formatting for data values of a given type.
//!
//! Without a formatter, a [`Value`](crate::Value) displays strings as-is and
//! every other type through its `Debug` implementation. Installing a formatter
//! for a type replaces that for every value of exactly that type, which is
//! useful for redacting secrets or shortening noisy values.
//!
//! # Examples
//!
//! ```
//! use std::fmt;
//!
//! use errnote::{Value, hooks::Hooks};
//!
//! #[derive(Debug)]
//! struct Password(String);
//!
//! Hooks::new()
//!     .value_formatter::<Password, _>(|_: &Password, f: &mut fmt::Formatter<'_>| f.write_str("<redacted>"))
//!     .install()
//!     .expect("failed to install hooks");
//!
//! assert_eq!(Value::new(Password("hunter2".into())).to_string(), "<redacted>");
//! ```

use core::{
    any::{Any, TypeId},
    fmt,
    marker::PhantomData,
};

use hashbrown::HashMap;
use triomphe::Arc;
use unsize::CoerceUnsize;

/// Formats data values of type `V`.
///
/// This is implemented for every `Fn(&V, &mut fmt::Formatter<'_>) ->
/// fmt::Result` closure that is `Send + Sync + 'static`.
pub trait ValueFormatterHook<V>: 'static + Send + Sync {
    /// Writes `value` to the formatter.
    fn display(&self, value: &V, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<V, F> ValueFormatterHook<V> for F
where
    F: Fn(&V, &mut fmt::Formatter<'_>) -> fmt::Result + 'static + Send + Sync,
{
    fn display(&self, value: &V, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self(value, f)
    }
}

trait StoredHook: 'static + Send + Sync {
    fn display_any(&self, value: &dyn Any, f: &mut fmt::Formatter<'_>) -> Option<fmt::Result>;
    fn type_name(&self) -> &'static str;
}

struct Hook<V, H> {
    hook: H,
    _hooked_type: PhantomData<fn(V) -> V>,
}

impl<V, H> StoredHook for Hook<V, H>
where
    V: 'static,
    H: ValueFormatterHook<V>,
{
    fn display_any(&self, value: &dyn Any, f: &mut fmt::Formatter<'_>) -> Option<fmt::Result> {
        let value = value.downcast_ref::<V>()?;
        Some(self.hook.display(value, f))
    }

    fn type_name(&self) -> &'static str {
        core::any::type_name::<V>()
    }
}

#[derive(Default)]
pub(crate) struct HookMap {
    map: HashMap<TypeId, Arc<dyn StoredHook>, rustc_hash::FxBuildHasher>,
}

impl fmt::Debug for HookMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.map.values().map(|hook| hook.type_name()))
            .finish()
    }
}

impl HookMap {
    pub(crate) fn insert<V, H>(&mut self, hook: H)
    where
        V: 'static,
        H: ValueFormatterHook<V>,
    {
        let hook: Hook<V, H> = Hook {
            hook,
            _hooked_type: PhantomData,
        };
        self.map.insert(
            TypeId::of::<V>(),
            Arc::new(hook).unsize(unsize::Coercion!(to dyn StoredHook)),
        );
    }

    /// Returns a handle to the formatter for the type of `value`, usable
    /// after the map itself is no longer borrowed.
    pub(crate) fn lookup(&self, value: &dyn Any) -> Option<FormatterHandle> {
        self.map.get(&value.type_id()).cloned().map(FormatterHandle)
    }
}

/// A shared handle to one installed formatter.
pub(crate) struct FormatterHandle(Arc<dyn StoredHook>);

impl FormatterHandle {
    pub(crate) fn display(&self, value: &dyn Any, f: &mut fmt::Formatter<'_>) -> Option<fmt::Result> {
        self.0.display_any(value, f)
    }
}
