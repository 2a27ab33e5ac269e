use core::{error::Error, fmt};

use super::{Annotated, Link};
use crate::Joined;

/// `{}` is the short form, `message: cause`. `{:#}` is the outermost message
/// alone, falling back to the cause when the node has no message.
impl fmt::Display for Annotated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cause = self.link.as_error();

        if f.alternate() {
            return match (&self.message, cause) {
                (Some(message), _) => f.write_str(message),
                (None, Some(cause)) => write!(f, "{cause:#}"),
                (None, None) => Ok(()),
            };
        }

        if let Some(message) = &self.message {
            f.write_str(message)?;
            if cause.is_some() {
                f.write_str(": ")?;
            }
        }
        if let Some(cause) = cause {
            write!(f, "{cause}")?;
        }
        Ok(())
    }
}

/// The extended form: every node from the innermost outwards, each followed by
/// its data and stack trace.
impl fmt::Debug for Annotated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.link {
            Link::Leaf => {}
            Link::Wrapped(cause) => {
                write_extended(&**cause, f)?;
                f.write_str("\n")?;
            }
            Link::Joined(joined) => {
                write_extended_joined(joined, f)?;
                f.write_str("\n")?;
            }
        }

        if let Some(message) = &self.message {
            f.write_str(message)?;
        }
        f.write_str(" >>>")?;

        if let Some(data) = self.data.as_ref().filter(|data| !data.is_empty()) {
            write!(f, "\n\tERROR DATA: {data}")?;
        }

        if let Some(stack) = &self.stack {
            if stack.is_abbreviated() {
                f.write_str("\n\tSTACK TRACE (abbr.):")?;
            } else {
                f.write_str("\n\tSTACK TRACE:")?;
            }
            if !stack.is_empty() {
                write!(f, "\n{stack}")?;
            }
        }
        Ok(())
    }
}

/// Writes the extended form of any error.
///
/// Foreign errors print their source chain first and then their own short
/// form, so nodes embedded in them are still shown in full.
pub(crate) fn write_extended(err: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if let Some(node) = err.downcast_ref::<Annotated>() {
        return fmt::Debug::fmt(node, f);
    }
    if let Some(joined) = err.downcast_ref::<Joined>() {
        return write_extended_joined(joined, f);
    }

    if let Some(source) = err.source() {
        write_extended(source, f)?;
        f.write_str("\n")?;
    }
    write!(f, "{err}")
}

pub(crate) fn write_extended_joined(joined: &Joined, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (index, member) in joined.iter().enumerate() {
        if index > 0 {
            f.write_str("\n")?;
        }
        write_extended(member, f)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use alloc::{format, string::ToString, vec::Vec};

    use super::*;
    use crate::{Stack, join, new, with_data, with_message, wrap};

    #[test]
    fn test_short_form() {
        let err = wrap(wrap(new("inner"), "middle"), "outer");
        assert_eq!(err.to_string(), "outer: middle: inner");
        assert_eq!(format!("{err:#}"), "outer");

        let bare = with_data(new("inner"), kv! { "k" => 1 });
        assert_eq!(bare.to_string(), "inner");
        assert_eq!(format!("{bare:#}"), "inner");
        assert_eq!(Annotated::empty().to_string(), "");
    }

    #[test]
    fn test_extended_without_stacks() {
        let err = with_data(with_message(core::fmt::Error, "m1"), kv! { "key" => "val" });
        assert_eq!(
            format!("{err:?}"),
            "an error occurred when formatting an argument\nm1 >>>\n >>>\n\tERROR DATA: {key:val}"
        );
    }

    #[test]
    fn test_extended_joined_members() {
        let err = with_message(
            join([with_message(core::fmt::Error, "a"), with_message(core::fmt::Error, "b")])
                .expect("non-empty"),
            "top",
        );
        let text = format!("{err:?}");
        assert!(text.ends_with("a >>>\nan error occurred when formatting an argument\nb >>>\ntop >>>"));
        assert!(text.starts_with("an error occurred when formatting an argument\na >>>"));
    }

    #[test]
    fn test_extended_has_stack_sections() {
        let err = wrap(new("inner"), "outer");
        let text = format!("{err:?}");
        assert!(text.starts_with("inner >>>"));
        assert!(text.contains("\nouter >>>"));

        if cfg!(feature = "backtrace") {
            assert!(text.contains("inner >>>\n\tSTACK TRACE:\n"));
            assert!(text.contains("outer >>>\n\tSTACK TRACE (abbr.):\n"));
        }
    }

    #[test]
    fn test_empty_abbreviated_stack_header() {
        let mut err = new("x");
        err.stack = Some(Stack::abbreviated(Vec::new()));
        assert_eq!(format!("{err:?}"), "x >>>\n\tSTACK TRACE (abbr.):");
    }
}
