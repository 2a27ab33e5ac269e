//! Integration with the [`anyhow`] 1.x error handling library.
//!
//! This module specifically supports `anyhow` version 1.x. To enable this
//! integration, add the `compat-anyhow1` feature flag to your `Cargo.toml`.
//!
//! # Reading annotations through anyhow
//!
//! An [`Annotated`] that travelled through `?` into an [`anyhow::Error`],
//! possibly with some `.context()` on top, is still reachable:
//!
//! ```
//! use anyhow::Context;
//! use errnote::{compat::anyhow1::AnyhowExt, kv, new, with_data};
//!
//! fn load() -> anyhow::Result<()> {
//!     Err::<(), _>(with_data(new("disk full"), kv! { "free_bytes" => 0u64 }))
//!         .context("saving state")?;
//!     Ok(())
//! }
//!
//! let err = load().unwrap_err();
//! assert_eq!(
//!     err.get_value("free_bytes").and_then(|v| v.downcast_ref::<u64>()),
//!     Some(&0)
//! );
//! assert_eq!(err.annotated().map(|node| node.to_string()).as_deref(), Some("disk full"));
//! ```
//!
//! # Converting from anyhow
//!
//! ```
//! use errnote::{Annotated, ResultExt, compat::IntoAnnotated};
//!
//! fn anyhow_function() -> anyhow::Result<String> {
//!     anyhow::bail!("failed to connect");
//! }
//!
//! let err: Annotated = anyhow_function().into_annotated().wrap("syncing").unwrap_err();
//! assert_eq!(err.to_string(), "syncing: failed to connect");
//! ```

use core::error::Error;

use super::IntoAnnotated;
use crate::{Annotated, KvPairs, Stack, Value, chain};

/// Reads annotations out of an [`anyhow::Error`].
///
/// Every method searches the whole chain of the error, including errors
/// wrapped with `.context()`.
pub trait AnyhowExt {
    /// Returns the nearest [`Annotated`] in the chain.
    fn annotated(&self) -> Option<&Annotated>;

    /// See [`chain::get_value`].
    fn get_value(&self, key: &str) -> Option<&Value>;

    /// See [`chain::get_all_data`].
    fn get_all_data(&self) -> KvPairs;

    /// See [`chain::stack_trace`].
    fn stack_trace(&self) -> Option<&Stack>;
}

fn as_dyn(err: &anyhow::Error) -> &(dyn Error + 'static) {
    let err: &(dyn Error + Send + Sync + 'static) = err.as_ref();
    err
}

impl AnyhowExt for anyhow::Error {
    fn annotated(&self) -> Option<&Annotated> {
        chain::nearest(as_dyn(self))
    }

    fn get_value(&self, key: &str) -> Option<&Value> {
        chain::get_value(as_dyn(self), key)
    }

    fn get_all_data(&self) -> KvPairs {
        chain::get_all_data(as_dyn(self))
    }

    fn stack_trace(&self) -> Option<&Stack> {
        chain::stack_trace(as_dyn(self))
    }
}

impl IntoAnnotated for anyhow::Error {
    type Output = Annotated;

    fn into_annotated(self) -> Self::Output {
        Annotated::empty().caused_by(self)
    }
}

impl<T> IntoAnnotated for anyhow::Result<T> {
    type Output = Result<T, Annotated>;

    fn into_annotated(self) -> Self::Output {
        self.map_err(IntoAnnotated::into_annotated)
    }
}
