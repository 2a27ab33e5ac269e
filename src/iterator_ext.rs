use alloc::vec::Vec;

use crate::{BoxError, Joined};

/// Extension methods for iterators over `Result` types to collect errors.
///
/// Where [`Iterator::collect`] into a `Result` stops at the first error,
/// these keep going and gather every error into one [`Joined`].
///
/// ```rust
/// use errnote::prelude::*;
///
/// let inputs = vec!["1", "2", "invalid", "4", "bad"];
///
/// // A plain collect stops at the first failure
/// let standard: Result<Vec<u8>, _> = inputs.iter().map(|s| s.parse::<u8>()).collect();
/// assert!(standard.is_err());
///
/// // collect_joined_vec reports both failures
/// let result = inputs
///     .into_iter()
///     .map(|s| s.parse::<u8>().wrap_with(|| format!("parsing {s:?}")))
///     .collect_joined_vec();
///
/// let joined = result.unwrap_err();
/// assert_eq!(joined.len(), 2);
/// assert_eq!(
///     joined.to_string(),
///     "parsing \"invalid\": invalid digit found in string\nparsing \"bad\": invalid digit found in string"
/// );
/// ```
pub trait IteratorExt<A, E>: Sized + Iterator<Item = Result<A, E>> {
    /// Collects successful values into a container, or all errors into a
    /// [`Joined`].
    ///
    /// The whole iterator is consumed even after the first error.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeSet;
    ///
    /// use errnote::prelude::*;
    ///
    /// let result: Result<BTreeSet<u8>, _> = ["1", "2", "2"]
    ///     .into_iter()
    ///     .map(|s| s.parse::<u8>())
    ///     .collect_joined();
    /// assert_eq!(result.unwrap(), BTreeSet::from([1u8, 2]));
    /// ```
    fn collect_joined<Container>(self) -> Result<Container, Joined>
    where
        Container: FromIterator<A>,
        E: Into<BoxError>;

    /// Collects successful values into a `Vec`, or all errors into a
    /// [`Joined`].
    ///
    /// Same as [`collect_joined`](IteratorExt::collect_joined), without having
    /// to name the container.
    fn collect_joined_vec(self) -> Result<Vec<A>, Joined>
    where
        E: Into<BoxError>;
}

/// Yields the `Ok` values until the first error, then drains the rest of the
/// source into `failures`.
struct OkValues<'a, I> {
    source: I,
    failures: &'a mut Option<Joined>,
}

impl<A, E, I> Iterator for OkValues<'_, I>
where
    I: Iterator<Item = Result<A, E>>,
    E: Into<BoxError>,
{
    type Item = A;

    fn next(&mut self) -> Option<A> {
        if self.failures.is_some() {
            return None;
        }
        match self.source.next()? {
            Ok(value) => Some(value),
            Err(first) => {
                *self.failures = Some(drain_errors(first, &mut self.source));
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.failures {
            Some(_) => (0, Some(0)),
            None => (0, self.source.size_hint().1),
        }
    }
}

fn drain_errors<A, E>(first: E, rest: impl Iterator<Item = Result<A, E>>) -> Joined
where
    E: Into<BoxError>,
{
    let mut joined = Joined::one(first.into());
    rest.filter_map(Result::err)
        .for_each(|err| joined.push(err.into()));
    joined
}

impl<A, E, I> IteratorExt<A, E> for I
where
    I: Iterator<Item = Result<A, E>>,
{
    fn collect_joined<Container>(self) -> Result<Container, Joined>
    where
        Container: FromIterator<A>,
        E: Into<BoxError>,
    {
        let mut failures = None;
        let collected: Container = OkValues {
            source: self,
            failures: &mut failures,
        }
        .collect();
        match failures {
            Some(joined) => Err(joined),
            None => Ok(collected),
        }
    }

    fn collect_joined_vec(mut self) -> Result<Vec<A>, Joined>
    where
        E: Into<BoxError>,
    {
        let mut values = Vec::with_capacity(self.size_hint().0);
        while let Some(item) = self.next() {
            match item {
                Ok(value) => values.push(value),
                Err(first) => return Err(drain_errors(first, self)),
            }
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::ToString, vec::Vec};

    use super::*;
    use crate::{Annotated, new};

    #[test]
    fn test_all_ok() {
        let values: Result<Vec<u8>, Joined> = [Ok::<u8, Annotated>(1), Ok(2)]
            .into_iter()
            .collect_joined();
        assert_eq!(values.ok(), Some(Vec::from([1, 2])));
    }

    #[test]
    fn test_errors_keep_order() {
        let joined = [Ok(1), Err(new("first")), Ok(3), Err(new("second"))]
            .into_iter()
            .collect_joined_vec()
            .unwrap_err();
        assert_eq!(joined.len(), 2);
        assert_eq!(joined.to_string(), "first\nsecond");

        let joined = [Err(new("only")), Ok(1)]
            .into_iter()
            .collect_joined::<Vec<u8>>()
            .unwrap_err();
        assert_eq!(joined.to_string(), "only");
    }
}
