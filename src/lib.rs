#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    unsafe_code,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Annotate errors with messages, stack traces and key/value data as they
//! propagate, without losing the original error.
//!
//! ## Overview
//!
//! The traditional propagation idiom in Rust is the `?` operator, which when
//! applied recursively up the call stack produces error values without any
//! context or debugging information. This crate lets call sites attach a
//! human-readable message, a captured call-stack snapshot, and arbitrary
//! key/value debug data to an error value on its way up, while keeping the
//! original error intact and inspectable.
//!
//! ## Quick Example
//!
//! ```
//! use errnote::prelude::*;
//!
//! fn read_config(path: &str) -> Result<String, Annotated> {
//!     let text = std::fs::read_to_string(path)
//!         .wrap_with_data("failed to read configuration file", kv! { "path" => path.to_string() })?;
//!     Ok(text)
//! }
//!
//! let err = read_config("/definitely/not/here").unwrap_err();
//! assert!(err.to_string().starts_with("failed to read configuration file: "));
//! assert_eq!(
//!     err.get_value("path").and_then(|v| v.downcast_ref::<String>()).map(String::as_str),
//!     Some("/definitely/not/here")
//! );
//! ```
//!
//! ## Core Concepts
//!
//! Every annotation produces an [`Annotated`] node. A node carries four
//! independent, optional axes:
//! - the wrapped **cause**: any error value, another [`Annotated`] node, or a
//!   [`Joined`] fan-in of several errors,
//! - a **message**,
//! - a **stack** snapshot captured when the node was built,
//! - a **data** map of string keys to arbitrary values.
//!
//! The constructors [`with_message`], [`with_stack`] and [`with_data`] each set
//! exactly one axis; [`wrap`] sets both message and stack, which is what most
//! call sites want. [`new`] and [`errorf!`] create a node without a cause.
//!
//! When a stack-capturing constructor wraps an error that already carries a
//! stack, only the frames unique to the new call site are stored and the node
//! is marked as holding an abbreviated stack. [`Annotated::stack_trace`]
//! always returns the first *full* stack found in the chain.
//!
//! ## Inspecting a chain
//!
//! - [`Annotated::get_value`] finds the first value for a key, searching the
//!   chain depth-first.
//! - [`Annotated::get_all_data`] merges the data of the whole chain; shallower
//!   nodes win over deeper ones, and later members of a [`Joined`] win over
//!   earlier members.
//! - [`cause`] unwinds to the deepest single cause.
//! - [`chain`] provides the same operations over any `dyn Error`, stepping
//!   through foreign error types that expose an [`Annotated`] through
//!   [`Error::source`](core::error::Error::source).
//!
//! ## Formatting
//!
//! - `{}` prints the short form: `outer: middle: inner`.
//! - `{:#}` prints the outermost message only.
//! - `{:?}` prints the extended form: every node from the innermost outwards,
//!   with its data and stack trace.
//!
//! ## Feature flags
//!
//! - `backtrace` (default): capture and symbolize real stack traces. Implies
//!   `std`.
//! - `std`: use `std::sync` for the global hook lock and read configuration
//!   from the environment.
//! - `compat-anyhow1`, `compat-eyre06`: access annotations through
//!   [`anyhow::Error`](https://docs.rs/anyhow) and
//!   [`eyre::Report`](https://docs.rs/eyre).

extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

#[macro_use]
mod macros;

pub mod chain;
pub mod compat;
pub mod hooks;
pub mod join;
pub mod kv;
pub mod prelude;
pub mod stack;

mod iterator_ext;
mod node;
mod result_ext;

pub use self::{
    chain::cause,
    iterator_ext::IteratorExt,
    join::{Joined, join},
    kv::{KvPairs, Value},
    node::{Annotated, new, with_data, with_message, with_stack, wrap, wrap_with_data},
    result_ext::ResultExt,
    stack::{Frame, Stack},
};

/// The boxed error type every cause is stored as.
pub type BoxError = alloc::boxed::Box<dyn core::error::Error + Send + Sync + 'static>;

/// A [`Result`](core::result::Result) type alias where the error is
/// [`Annotated`].
///
/// # Examples
///
/// ```
/// fn might_fail() -> errnote::Result<u32> {
///     Ok(7)
/// }
/// assert_eq!(might_fail().ok(), Some(7));
/// ```
pub type Result<T, E = Annotated> = core::result::Result<T, E>;

// Not public API. Referenced by macro-generated code.
#[doc(hidden)]
pub mod __private {
    use alloc::{borrow::Cow, fmt};

    #[doc(hidden)]
    pub use core::{format_args, result::Result::Err};

    use crate::{Annotated, BoxError, node};

    fn message_from_args(args: fmt::Arguments<'_>) -> Cow<'static, str> {
        if let Some(message) = args.as_str() {
            Cow::Borrowed(message)
        } else {
            Cow::Owned(fmt::format(args))
        }
    }

    #[doc(hidden)]
    #[cold]
    #[inline(never)]
    #[must_use]
    pub fn format_error(args: fmt::Arguments<'_>) -> Annotated {
        node::build_root(message_from_args(args), 1)
    }

    #[doc(hidden)]
    #[cold]
    #[inline(never)]
    #[must_use]
    pub fn format_wrap<E>(cause: E, args: fmt::Arguments<'_>) -> Annotated
    where
        E: Into<BoxError>,
    {
        node::build_wrap(cause.into(), message_from_args(args), 1)
    }

    #[doc(hidden)]
    #[cold]
    #[must_use]
    pub fn format_message<E>(cause: E, args: fmt::Arguments<'_>) -> Annotated
    where
        E: Into<BoxError>,
    {
        Annotated::from_cause(cause.into()).with_own_message(message_from_args(args))
    }
}
