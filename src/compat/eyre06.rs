//! Integration with the [`eyre`] 0.6.x error handling library.
//!
//! This module specifically supports `eyre` version 0.6.x. To enable this
//! integration, add the `compat-eyre06` feature flag to your `Cargo.toml`.
//!
//! # Reading annotations through eyre
//!
//! ```
//! use errnote::{compat::eyre06::EyreExt, kv, new, with_data};
//!
//! let report = eyre::Report::new(with_data(new("disk full"), kv! { "device" => "sda" }))
//!     .wrap_err("saving state");
//!
//! assert_eq!(report.get_all_data().to_string(), "{device:sda}");
//! assert!(report.annotated().is_some());
//! ```
//!
//! # Converting from eyre
//!
//! ```
//! use errnote::{Annotated, compat::IntoAnnotated};
//!
//! fn eyre_function() -> eyre::Result<String> {
//!     eyre::bail!("something went wrong");
//! }
//!
//! let err: Annotated = eyre_function().into_annotated().unwrap_err();
//! assert_eq!(err.to_string(), "something went wrong");
//! ```

use core::error::Error;

use super::IntoAnnotated;
use crate::{Annotated, KvPairs, Stack, Value, chain};

/// Reads annotations out of an [`eyre::Report`].
///
/// Every method searches the whole chain of the report, including errors
/// wrapped with `.wrap_err()`.
pub trait EyreExt {
    /// Returns the nearest [`Annotated`] in the chain.
    fn annotated(&self) -> Option<&Annotated>;

    /// See [`chain::get_value`].
    fn get_value(&self, key: &str) -> Option<&Value>;

    /// See [`chain::get_all_data`].
    fn get_all_data(&self) -> KvPairs;

    /// See [`chain::stack_trace`].
    fn stack_trace(&self) -> Option<&Stack>;
}

fn as_dyn(report: &eyre::Report) -> &(dyn Error + 'static) {
    let err: &(dyn Error + Send + Sync + 'static) = report.as_ref();
    err
}

impl EyreExt for eyre::Report {
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

impl IntoAnnotated for eyre::Report {
    type Output = Annotated;

    fn into_annotated(self) -> Self::Output {
        Annotated::empty().caused_by(self)
    }
}

impl<T> IntoAnnotated for eyre::Result<T> {
    type Output = Result<T, Annotated>;

    fn into_annotated(self) -> Self::Output {
        self.map_err(IntoAnnotated::into_annotated)
    }
}
