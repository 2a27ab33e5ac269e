use alloc::borrow::Cow;

use crate::{
    Annotated, BoxError,
    kv::KvPairs,
    node::{self, build_stack, build_wrap},
};

mod sealed {
    pub trait Sealed {}
    impl<T, E> Sealed for Result<T, E> {}
}

/// Annotation methods for `Result`.
///
/// Each method annotates the error of an `Err` exactly like the free function
/// of the same name and leaves an `Ok` untouched, so an absent error stays
/// absent.
///
/// # Examples
///
/// ```
/// use errnote::prelude::*;
///
/// fn parse_port(text: &str) -> Result<u16, Annotated> {
///     text.parse::<u16>().wrap_with(|| format!("invalid port {text:?}"))
/// }
///
/// assert_eq!(parse_port("8080").unwrap(), 8080);
/// assert_eq!(
///     parse_port("http").unwrap_err().to_string(),
///     "invalid port \"http\": invalid digit found in string"
/// );
/// ```
pub trait ResultExt<T, E>: sealed::Sealed {
    /// Wraps the error with a message and the current stack trace.
    ///
    /// See [`wrap`](crate::wrap).
    #[must_use]
    fn wrap(self, message: impl Into<Cow<'static, str>>) -> Result<T, Annotated>
    where
        E: Into<BoxError>;

    /// Like [`wrap`](ResultExt::wrap), building the message only on error.
    #[must_use]
    fn wrap_with<M, F>(self, message: F) -> Result<T, Annotated>
    where
        E: Into<BoxError>,
        F: FnOnce() -> M,
        M: Into<Cow<'static, str>>;

    /// Wraps the error with a message only.
    ///
    /// See [`with_message`](crate::with_message).
    #[must_use]
    fn with_message(self, message: impl Into<Cow<'static, str>>) -> Result<T, Annotated>
    where
        E: Into<BoxError>;

    /// Wraps the error with the current stack trace only.
    ///
    /// See [`with_stack`](crate::with_stack).
    #[must_use]
    fn with_stack(self) -> Result<T, Annotated>
    where
        E: Into<BoxError>;

    /// Wraps the error with key/value data only.
    ///
    /// See [`with_data`](crate::with_data).
    #[must_use]
    fn with_data(self, pairs: KvPairs) -> Result<T, Annotated>
    where
        E: Into<BoxError>;

    /// Wraps the error with a message, key/value data and the current stack
    /// trace.
    ///
    /// See [`wrap_with_data`](crate::wrap_with_data).
    #[must_use]
    fn wrap_with_data(
        self,
        message: impl Into<Cow<'static, str>>,
        pairs: KvPairs,
    ) -> Result<T, Annotated>
    where
        E: Into<BoxError>;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    #[inline(never)]
    fn wrap(self, message: impl Into<Cow<'static, str>>) -> Result<T, Annotated>
    where
        E: Into<BoxError>,
    {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(build_wrap(e.into(), message.into(), 1)),
        }
    }

    #[inline(never)]
    fn wrap_with<M, F>(self, message: F) -> Result<T, Annotated>
    where
        E: Into<BoxError>,
        F: FnOnce() -> M,
        M: Into<Cow<'static, str>>,
    {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(build_wrap(e.into(), message().into(), 1)),
        }
    }

    fn with_message(self, message: impl Into<Cow<'static, str>>) -> Result<T, Annotated>
    where
        E: Into<BoxError>,
    {
        self.map_err(|e| node::with_message(e, message))
    }

    #[inline(never)]
    fn with_stack(self) -> Result<T, Annotated>
    where
        E: Into<BoxError>,
    {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(build_stack(e.into(), 1)),
        }
    }

    fn with_data(self, pairs: KvPairs) -> Result<T, Annotated>
    where
        E: Into<BoxError>,
    {
        self.map_err(|e| node::with_data(e, pairs))
    }

    #[inline(never)]
    fn wrap_with_data(
        self,
        message: impl Into<Cow<'static, str>>,
        pairs: KvPairs,
    ) -> Result<T, Annotated>
    where
        E: Into<BoxError>,
    {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(build_wrap(e.into(), message.into(), 1).and_data(pairs)),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;
    use crate::new;

    #[test]
    fn test_ok_passes_through() {
        let ok: Result<u8, Annotated> = Ok(3);
        assert_eq!(ok.wrap("unused").ok(), Some(3));

        let ok: Result<u8, core::fmt::Error> = Ok(4);
        let called = core::cell::Cell::new(false);
        let result = ok.wrap_with(|| {
            called.set(true);
            "unused"
        });
        assert_eq!(result.ok(), Some(4));
        assert!(!called.get());
    }

    #[test]
    fn test_err_is_annotated() {
        let err: Result<(), Annotated> = Err(new("inner"));
        let err = err
            .with_data(kv! { "attempt" => 2 })
            .with_message("retrying")
            .wrap("giving up")
            .unwrap_err();
        assert_eq!(err.to_string(), "giving up: retrying: inner");
        assert!(err.get_value("attempt").is_some());
    }

    #[test]
    fn test_with_stack_on_foreign_error() {
        let err: Result<(), core::fmt::Error> = Err(core::fmt::Error);
        let err = err.with_stack().unwrap_err();
        assert!(err.message().is_none());
        assert_eq!(err.stack_trace().is_some(), cfg!(feature = "backtrace"));
    }
}
