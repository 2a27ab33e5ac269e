//! Commonly used items for convenient importing.
//!
//! # Usage
//!
//! ```rust
//! use errnote::prelude::*;
//!
//! fn divide(a: i32, b: i32) -> Result<i32, Annotated> {
//!     if b == 0 {
//!         bail!("cannot divide {} by zero", a);
//!     }
//!     Ok(a / b)
//! }
//!
//! assert_eq!(divide(10, 2).unwrap(), 5);
//! assert_eq!(divide(1, 0).unwrap_err().to_string(), "cannot divide 1 by zero");
//! ```
//!
//! # What's Included
//!
//! - **[`Annotated`]**: The annotated error type
//! - **[`ResultExt`]**: Annotation methods for `Result`
//! - **[`IteratorExt`]**: Collecting every error of an iterator
//! - **[`errorf!`]**, **[`wrapf!`]**, **[`with_messagef!`]** and
//!   **[`bail!`]**: Macros for creating and returning errors
//! - **[`kv!`]**, **[`KvPairs`]** and **[`Value`]**: Key/value data
//! - **[`chain`]**: Traversal over any error chain

pub use crate::{
    Annotated, KvPairs, Value, bail, chain, errorf, iterator_ext::IteratorExt, kv,
    result_ext::ResultExt, with_messagef, wrapf,
};
