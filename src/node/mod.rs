mod data;
pub(crate) mod format;

use alloc::{
    borrow::Cow,
    boxed::Box,
    format,
    string::{String, ToString},
};
use core::error::Error;

use crate::{BoxError, Joined, chain, kv::KvPairs, stack::Stack};

/// An error annotated with a message, a stack trace and/or key/value data.
///
/// A node carries four independent, optional axes: the wrapped cause, a
/// message, a stack captured when the node was built, and a data map. The
/// free functions [`new`], [`wrap`], [`with_message`], [`with_stack`],
/// [`with_data`] and [`wrap_with_data`] each build a node with a fixed set of
/// axes. Only the data can change after construction, through
/// [`set_key_val`](Self::set_key_val) and [`set_data`](Self::set_data).
///
/// # Examples
///
/// ```
/// use errnote::{cause, new, wrap};
///
/// let e = new("error");
/// let e2 = wrap(e, "error2");
/// assert_eq!(e2.to_string(), "error2: error");
/// assert_eq!(cause(&e2).to_string(), "error");
/// ```
pub struct Annotated {
    link: Link,
    message: Option<Cow<'static, str>>,
    stack: Option<Stack>,
    data: Option<KvPairs>,
}

enum Link {
    Leaf,
    Wrapped(BoxError),
    Joined(Joined),
}

impl Link {
    fn from_cause(cause: BoxError) -> Self {
        match cause.downcast::<Joined>() {
            Ok(joined) => Link::Joined(*joined),
            Err(cause) => Link::Wrapped(cause),
        }
    }

    fn as_error(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Link::Leaf => None,
            Link::Wrapped(cause) => Some(&**cause),
            Link::Joined(joined) => Some(joined),
        }
    }
}

/// Creates an error with the given message and the current stack trace.
///
/// See [`errorf!`](crate::errorf) for a formatting version.
///
/// # Examples
///
/// ```
/// let err = errnote::new("connection refused");
/// assert_eq!(err.to_string(), "connection refused");
/// assert!(err.inner().is_none());
/// ```
#[inline(never)]
#[must_use]
pub fn new(message: impl Into<Cow<'static, str>>) -> Annotated {
    build_root(message.into(), 1)
}

/// Wraps `cause` with a message and the current stack trace.
///
/// This is what most call sites want. If `cause` already carries a stack
/// trace, the new one is abbreviated against it.
///
/// See [`wrapf!`](crate::wrapf) for a formatting version and
/// [`ResultExt::wrap`](crate::ResultExt::wrap) for use on a `Result`.
#[inline(never)]
#[must_use]
pub fn wrap<E>(cause: E, message: impl Into<Cow<'static, str>>) -> Annotated
where
    E: Into<BoxError>,
{
    build_wrap(cause.into(), message.into(), 1)
}

/// Wraps `cause` with a message only.
///
/// # Examples
///
/// ```
/// let err = errnote::with_message(std::fmt::Error, "rendering failed");
/// assert_eq!(
///     err.to_string(),
///     "rendering failed: an error occurred when formatting an argument"
/// );
/// assert!(err.stack_trace().is_none());
/// ```
#[must_use]
pub fn with_message<E>(cause: E, message: impl Into<Cow<'static, str>>) -> Annotated
where
    E: Into<BoxError>,
{
    Annotated::from_cause(cause.into()).with_own_message(message.into())
}

/// Wraps `cause` with the current stack trace only.
#[inline(never)]
#[must_use]
pub fn with_stack<E>(cause: E) -> Annotated
where
    E: Into<BoxError>,
{
    build_stack(cause.into(), 1)
}

/// Wraps `cause` with key/value data only.
///
/// Reserved keys in `pairs` are skipped.
///
/// # Examples
///
/// ```
/// use errnote::{kv, new, with_data};
///
/// let err = with_data(new("error"), kv! { "key" => "val" });
/// assert_eq!(err.to_string(), "error");
/// assert!(format!("{err:?}").contains("ERROR DATA: {key:val}"));
/// ```
#[must_use]
pub fn with_data<E>(cause: E, pairs: KvPairs) -> Annotated
where
    E: Into<BoxError>,
{
    Annotated::from_cause(cause.into()).and_data(pairs)
}

/// Wraps `cause` with a message, key/value data and the current stack trace.
#[inline(never)]
#[must_use]
pub fn wrap_with_data<E>(cause: E, message: impl Into<Cow<'static, str>>, pairs: KvPairs) -> Annotated
where
    E: Into<BoxError>,
{
    build_wrap(cause.into(), message.into(), 1).and_data(pairs)
}

/// Builds a cause-less node. `skip` counts the frames between this call and
/// the caller whose call site should head the stack.
#[inline(always)]
pub(crate) fn build_root(message: Cow<'static, str>, skip: usize) -> Annotated {
    Annotated {
        link: Link::Leaf,
        message: Some(message),
        stack: Stack::capture(skip),
        data: None,
    }
}

#[inline(always)]
pub(crate) fn build_wrap(cause: BoxError, message: Cow<'static, str>, skip: usize) -> Annotated {
    build_stack(cause, skip).with_own_message(message)
}

#[inline(always)]
pub(crate) fn build_stack(cause: BoxError, skip: usize) -> Annotated {
    let stack = Stack::capture_over(skip, chain::stack_trace(&*cause));
    Annotated {
        stack,
        ..Annotated::from_cause(cause)
    }
}

impl Annotated {
    /// Creates a node with no axes set.
    ///
    /// This is mostly useful as the starting point for
    /// [`caused_by`](Self::caused_by) and [`and_data`](Self::and_data).
    ///
    /// # Examples
    ///
    /// ```
    /// use errnote::{Annotated, kv};
    ///
    /// let err = Annotated::empty().and_data(kv! { "magic" => 144 });
    /// assert_eq!(err.to_string(), "");
    /// assert!(err.get_value("magic").is_some());
    /// ```
    pub const fn empty() -> Self {
        Self {
            link: Link::Leaf,
            message: None,
            stack: None,
            data: None,
        }
    }

    pub(crate) fn from_cause(cause: BoxError) -> Self {
        Self {
            link: Link::from_cause(cause),
            ..Self::empty()
        }
    }

    pub(crate) fn with_own_message(mut self, message: Cow<'static, str>) -> Self {
        self.message = Some(message);
        self
    }

    /// Sets the cause of this node, replacing any previous one.
    ///
    /// This lets a type that builds its own node (for instance to set data
    /// before anything else) attach the error it wraps afterwards.
    #[must_use]
    pub fn caused_by<E>(mut self, cause: E) -> Self
    where
        E: Into<BoxError>,
    {
        self.link = Link::from_cause(cause.into());
        self
    }

    /// Adds data to this node, skipping reserved keys.
    ///
    /// This is the consuming form of [`set_data`](Self::set_data).
    #[must_use]
    pub fn and_data(mut self, pairs: KvPairs) -> Self {
        self.set_data(pairs);
        self
    }

    /// Returns the message of this node only.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the stack stored on this node only, full or abbreviated.
    ///
    /// Use [`stack_trace`](Self::stack_trace) to find the full stack trace of
    /// the chain.
    pub fn stack(&self) -> Option<&Stack> {
        self.stack.as_ref()
    }

    /// Returns the data stored on this node only.
    ///
    /// Use [`get_value`](Self::get_value) and
    /// [`get_all_data`](Self::get_all_data) to search the whole chain.
    pub fn data(&self) -> Option<&KvPairs> {
        self.data.as_ref()
    }

    /// Returns the immediate cause, if any.
    ///
    /// When the cause is a [`Joined`], the join itself is returned.
    pub fn inner(&self) -> Option<&(dyn Error + 'static)> {
        self.link.as_error()
    }

    /// Returns the joined causes if this node wraps a [`Joined`].
    pub fn joined(&self) -> Option<&Joined> {
        match &self.link {
            Link::Joined(joined) => Some(joined),
            _ => None,
        }
    }

    /// Consumes the node and returns its immediate cause, if any.
    pub fn into_inner(self) -> Option<BoxError> {
        match self.link {
            Link::Leaf => None,
            Link::Wrapped(cause) => Some(cause),
            Link::Joined(joined) => Some(Box::new(joined)),
        }
    }

    /// Returns the first full stack trace in the chain, starting with this
    /// node.
    ///
    /// Abbreviated stacks are skipped in favor of the full stack they were
    /// abbreviated against. Returns `None` when no node in the chain holds a
    /// full stack, for instance when the `backtrace` feature is disabled.
    pub fn stack_trace(&self) -> Option<&Stack> {
        chain::stack_trace(self)
    }

    /// Unwinds to the deepest single cause. See [`chain::cause`].
    pub fn root_cause(&self) -> &(dyn Error + 'static) {
        chain::cause(self)
    }

    /// Iterates over this node and everything it wraps. See [`chain::iter`].
    pub fn chain(&self) -> chain::Iter<'_> {
        chain::iter(self)
    }

    /// Returns the short form in double quotes, with special characters
    /// escaped.
    ///
    /// # Examples
    ///
    /// ```
    /// use errnote::{new, wrap};
    ///
    /// let err = wrap(new("\"inner\""), "outer");
    /// assert_eq!(err.quoted(), r#""outer: \"inner\"""#);
    /// ```
    pub fn quoted(&self) -> String {
        format!("{:?}", self.to_string())
    }
}

impl Error for Annotated {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.link.as_error()
    }
}
