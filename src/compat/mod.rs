//! Interoperability with other error handling libraries.
//!
//! # Available Integrations
//!
//! - [`anyhow1`] - Integration with the `anyhow` 1.x error handling library
//!   (requires the `compat-anyhow1` feature flag)
//! - [`eyre06`] - Integration with the `eyre` 0.6.x error handling library
//!   (requires the `compat-eyre06` feature flag)
//!
//! An [`Annotated`](crate::Annotated) already implements
//! [`core::error::Error`], so it converts into either library's error type
//! with `?` or `From`. The other direction goes through [`IntoAnnotated`], and
//! the extension traits of each module read annotations back out of those
//! libraries' error types without converting them.
//!
//! # Example
//!
//! ```
//! use errnote::prelude::*;
//!
//! # #[cfg(feature = "compat-anyhow1")] {
//! use errnote::compat::IntoAnnotated;
//!
//! fn legacy_function() -> anyhow::Result<String> {
//!     anyhow::bail!("something went wrong");
//! }
//!
//! fn new_function() -> Result<String, Annotated> {
//!     let value = legacy_function().into_annotated().wrap("calling legacy code")?;
//!     Ok(value)
//! }
//!
//! assert_eq!(
//!     new_function().unwrap_err().to_string(),
//!     "calling legacy code: something went wrong"
//! );
//! # }
//! ```

/// Converts an external error type into an [`Annotated`](crate::Annotated).
///
/// The external error becomes the cause of a node with no other axes set, so
/// the node displays exactly like the original error and further
/// annotations can be added with the usual functions.
pub trait IntoAnnotated {
    /// The type produced by the conversion: [`Annotated`](crate::Annotated)
    /// for errors, `Result<T, Annotated>` for results.
    type Output;

    /// Converts this value.
    fn into_annotated(self) -> Self::Output;
}

#[cfg(feature = "compat-anyhow1")]
#[cfg_attr(docsrs, doc(cfg(feature = "compat-anyhow1")))]
pub mod anyhow1;

#[cfg(feature = "compat-eyre06")]
#[cfg_attr(docsrs, doc(cfg(feature = "compat-eyre06")))]
pub mod eyre06;
