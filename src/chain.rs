//! Traversal over any error chain.
//!
//! These functions work on a plain `&(dyn Error + 'static)`, so they see
//! through foreign error types: a `thiserror` enum that returns an
//! [`Annotated`] from [`source`](Error::source) takes part in lookups just
//! like the node itself. [`Joined`] errors are descended into member by member,
//! in join order.
//!
//! The methods of the same name on [`Annotated`] are shorthands for these.

use alloc::vec::Vec;
use core::{error::Error, iter::FusedIterator};

use crate::{
    Annotated, Joined,
    kv::{KvPairs, Value, is_reserved_key},
    stack::Stack,
};

/// A pre-order, depth-first iterator over an error and everything it wraps.
///
/// Created with [`iter`].
#[must_use]
pub struct Iter<'a> {
    stack: Vec<&'a (dyn Error + 'static)>,
}

/// Iterates over `err` and every error reachable from it.
///
/// Each error is followed by its [`source`](Error::source); a [`Joined`] is
/// followed by each of its members (and everything below it) in join order.
///
/// # Examples
///
/// ```
/// use errnote::{chain, join, new, wrap};
///
/// let err = wrap(join([new("a"), new("b")]).unwrap(), "top");
/// let seen: Vec<String> = chain::iter(&err).map(|e| format!("{e:#}")).collect();
/// assert_eq!(seen, ["top", "a\nb", "a", "b"]);
/// ```
pub fn iter<'a>(err: &'a (dyn Error + 'static)) -> Iter<'a> {
    let mut stack = Vec::with_capacity(4);
    stack.push(err);
    Iter { stack }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a (dyn Error + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let cur = self.stack.pop()?;
        if let Some(joined) = cur.downcast_ref::<Joined>() {
            self.stack.extend(joined.iter().rev());
        } else if let Some(source) = cur.source() {
            self.stack.push(source);
        }
        Some(cur)
    }
}

impl FusedIterator for Iter<'_> {}

/// Returns the first error of type `T` in the chain.
///
/// # Examples
///
/// ```
/// use errnote::{chain, wrap};
///
/// let err = wrap(std::fmt::Error, "rendering failed");
/// assert!(chain::find::<std::fmt::Error>(&err).is_some());
/// assert!(chain::find::<std::io::Error>(&err).is_none());
/// ```
pub fn find<'a, T: Error + 'static>(err: &'a (dyn Error + 'static)) -> Option<&'a T> {
    iter(err).find_map(|e| e.downcast_ref::<T>())
}

/// Returns `true` if any error in the chain satisfies `predicate`.
pub fn any<F>(err: &(dyn Error + 'static), mut predicate: F) -> bool
where
    F: FnMut(&(dyn Error + 'static)) -> bool,
{
    iter(err).any(|e| predicate(e))
}

/// Returns the nearest [`Annotated`] node in the chain, which may be `err`
/// itself.
pub fn nearest<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a Annotated> {
    find::<Annotated>(err)
}

/// Unwinds to the deepest single cause.
///
/// Follows [`source`](Error::source) until an error has none and returns that
/// error. A [`Joined`] has no single source, so unwinding stops there.
///
/// # Examples
///
/// ```
/// use errnote::{cause, new, wrap};
///
/// let err = wrap(wrap(new("error"), "error2"), "error3");
/// assert_eq!(cause(&err).to_string(), "error");
/// ```
pub fn cause<'a>(err: &'a (dyn Error + 'static)) -> &'a (dyn Error + 'static) {
    let mut cur = err;
    while let Some(source) = cur.source() {
        cur = source;
    }
    cur
}

/// Finds the first value stored under `key`, searching the chain pre-order.
///
/// Reserved keys are never found.
pub fn get_value<'a>(err: &'a (dyn Error + 'static), key: &str) -> Option<&'a Value> {
    if is_reserved_key(key) {
        return None;
    }
    iter(err)
        .filter_map(|e| e.downcast_ref::<Annotated>())
        .find_map(|node| node.data()?.get(key))
}

/// Merges the data of every node in the chain.
///
/// Deeper nodes are collected first and shallower nodes overlay them, so the
/// value closest to `err` wins. Members of a [`Joined`] are merged in join
/// order, so later members win over earlier ones; a node wrapping the join
/// still wins over all of them.
///
/// # Examples
///
/// ```
/// use errnote::{chain, join, kv, new, with_data};
///
/// let x = with_data(new("x"), kv! { "k" => "x", "only_x" => 1 });
/// let y = with_data(new("y"), kv! { "k" => "y" });
/// let err = join([x, y]).unwrap();
///
/// let data = chain::get_all_data(&err);
/// assert_eq!(data.to_string(), "{k:y, only_x:1}");
/// ```
pub fn get_all_data(err: &(dyn Error + 'static)) -> KvPairs {
    let mut data = KvPairs::new();
    collect_data(err, &mut data);
    data
}

fn collect_data(err: &(dyn Error + 'static), data: &mut KvPairs) {
    if let Some(joined) = err.downcast_ref::<Joined>() {
        for member in joined.iter() {
            collect_data(member, data);
        }
        return;
    }

    if let Some(source) = err.source() {
        collect_data(source, data);
    }
    if let Some(own) = err.downcast_ref::<Annotated>().and_then(Annotated::data) {
        data.overlay_public(own);
    }
}

/// Returns the first full stack trace in the chain, searching pre-order.
///
/// Abbreviated stacks are skipped: the search continues into the wrapped
/// error, which holds the full stack they were abbreviated against. Joined
/// members are searched in join order.
pub fn stack_trace<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a Stack> {
    iter(err)
        .filter_map(|e| e.downcast_ref::<Annotated>())
        .find_map(|node| node.stack().filter(|stack| !stack.is_abbreviated()))
}
