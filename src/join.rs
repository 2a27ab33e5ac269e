//! Fan-in of several errors into one.
//!
//! A [`Joined`] error holds an ordered, non-empty list of errors. It has no
//! single [`source`](core::error::Error::source); traversal in [`chain`] and
//! on [`Annotated`] visits its members in order instead.
//!
//! [`chain`]: crate::chain
//! [`Annotated`]: crate::Annotated

use alloc::vec::Vec;
use core::{error::Error, fmt};

use crate::{BoxError, node::format};

/// An ordered, non-empty list of errors combined into one.
///
/// Created with [`join`] or
/// [`IteratorExt::collect_joined`](crate::IteratorExt::collect_joined).
///
/// `Display` writes the short form of every member, one per line. `Debug`
/// writes the extended form of every member, one after another.
pub struct Joined {
    errors: Vec<BoxError>,
}

/// Combines errors into a single [`Joined`] error.
///
/// Returns `None` when `errors` is empty. A single error is wrapped in a
/// one-element [`Joined`].
///
/// # Examples
///
/// ```
/// use errnote::{join, new, wrap};
///
/// let joined = join([new("disk full"), new("quota exceeded")]).unwrap();
/// assert_eq!(joined.to_string(), "disk full\nquota exceeded");
///
/// let err = wrap(joined, "saving failed");
/// assert_eq!(err.to_string(), "saving failed: disk full\nquota exceeded");
///
/// assert!(join(Vec::<std::io::Error>::new()).is_none());
/// ```
pub fn join<I>(errors: I) -> Option<Joined>
where
    I: IntoIterator,
    I::Item: Into<BoxError>,
{
    let errors: Vec<BoxError> = errors.into_iter().map(Into::into).collect();
    if errors.is_empty() {
        None
    } else {
        Some(Joined { errors })
    }
}

impl Joined {
    /// Returns the members in join order.
    pub fn errors(&self) -> &[BoxError] {
        &self.errors
    }

    /// Iterates over the members in join order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &(dyn Error + 'static)> + DoubleEndedIterator {
        self.errors.iter().map(|err| {
            let err: &(dyn Error + 'static) = &**err;
            err
        })
    }

    /// Returns the number of members. This is never zero.
    #[allow(
        clippy::len_without_is_empty,
        reason = "a joined error always has at least one member"
    )]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Consumes the join and returns its members.
    pub fn into_errors(self) -> Vec<BoxError> {
        self.errors
    }

    pub(crate) fn one(error: BoxError) -> Self {
        let mut errors = Vec::with_capacity(1);
        errors.push(error);
        Self { errors }
    }

    pub(crate) fn push(&mut self, error: BoxError) {
        self.errors.push(error);
    }
}

impl fmt::Display for Joined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, err) in self.errors.iter().enumerate() {
            if index > 0 {
                f.write_str("\n")?;
            }
            if f.alternate() {
                write!(f, "{err:#}")?;
            } else {
                write!(f, "{err}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Joined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format::write_extended_joined(self, f)
    }
}

impl Error for Joined {}
