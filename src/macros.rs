/// Creates a new [`Annotated`](crate::Annotated) error from a format string.
///
/// The arguments are interpreted in the same way as the [`format!()`] macro.
/// The resulting node has no cause, carries the formatted text as its message,
/// and records the stack trace at the point the macro was invoked.
///
/// When the format string has no arguments the message is stored without
/// allocating.
///
/// [`format!()`]: std::format
///
/// # Examples
///
/// ```
/// use errnote::errorf;
///
/// let err = errorf!("whoops: {}", "foo");
/// assert_eq!(err.to_string(), "whoops: foo");
/// assert!(err.inner().is_none());
/// ```
#[macro_export]
macro_rules! errorf {
    ($($arg:tt)*) => {
        $crate::__private::format_error($crate::__private::format_args!($($arg)*))
    };
}

/// Wraps an error with a formatted message and a stack trace.
///
/// This is the formatting counterpart of [`wrap`](crate::wrap). The first
/// argument is the cause, the rest are interpreted like [`format!()`].
///
/// [`format!()`]: std::format
///
/// # Examples
///
/// ```
/// use errnote::{errorf, wrapf};
///
/// let cause = errorf!("whoops");
/// let err = wrapf!(cause, "oh noes #{}", 2);
/// assert_eq!(err.to_string(), "oh noes #2: whoops");
/// ```
#[macro_export]
macro_rules! wrapf {
    ($cause:expr, $($arg:tt)*) => {
        $crate::__private::format_wrap($cause, $crate::__private::format_args!($($arg)*))
    };
}

/// Annotates an error with a formatted message, without capturing a stack.
///
/// This is the formatting counterpart of [`with_message`](crate::with_message).
///
/// # Examples
///
/// ```
/// use errnote::with_messagef;
///
/// let err = with_messagef!(std::fmt::Error, "rendering row {}", 3);
/// assert_eq!(err.to_string(), "rendering row 3: an error occurred when formatting an argument");
/// assert!(err.stack().is_none());
/// ```
#[macro_export]
macro_rules! with_messagef {
    ($cause:expr, $($arg:tt)*) => {
        $crate::__private::format_message($cause, $crate::__private::format_args!($($arg)*))
    };
}

/// Return early with an error.
///
/// Constructs a new error using the same arguments as [`errorf!`] and returns
/// it from the enclosing function wrapped in an `Err`, converting with
/// [`Into`].
///
/// # Examples
///
/// ```
/// use errnote::{Annotated, bail};
///
/// fn check(value: i32) -> Result<(), Annotated> {
///     if value < 0 {
///         bail!("value must be non-negative, got {}", value);
///     }
///     Ok(())
/// }
///
/// assert_eq!(check(-3).unwrap_err().to_string(), "value must be non-negative, got -3");
/// ```
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return $crate::__private::Err($crate::errorf!($($arg)*).into())
    };
}

/// Builds a [`KvPairs`](crate::KvPairs) map from `key => value` pairs.
///
/// Values may be of different types; each is wrapped with
/// [`Value::new`](crate::Value::new).
///
/// # Examples
///
/// ```
/// use errnote::kv;
///
/// let pairs = kv! { "user" => "alice", "attempt" => 3u32 };
/// assert_eq!(pairs.len(), 2);
/// assert_eq!(pairs.get("attempt").and_then(|v| v.downcast_ref::<u32>()), Some(&3));
/// ```
#[macro_export]
macro_rules! kv {
    () => {
        $crate::KvPairs::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        {
            let mut pairs = $crate::KvPairs::new();
            $(
                pairs.insert($key, $crate::Value::new($value));
            )+
            pairs
        }
    };
}
