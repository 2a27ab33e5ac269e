//! Stack capture, abbreviation and retrieval across chains.

use core::fmt;

use errnote::{Annotated, Stack, join, new, with_message, with_stack, wrap};

fn member_stack(err: &Annotated, index: usize) -> Option<&Stack> {
    err.joined()?
        .iter()
        .nth(index)?
        .downcast_ref::<Annotated>()?
        .stack()
}

#[cfg(feature = "backtrace")]
mod captured {
    use super::*;

    #[inline(never)]
    fn inner() -> Annotated {
        new("inner")
    }

    #[inline(never)]
    fn outer() -> Annotated {
        wrap(inner(), "outer")
    }

    #[test]
    fn test_leaf_has_full_stack() {
        let err = inner();
        let stack = err.stack().expect("captured");
        assert!(!stack.is_abbreviated());
        assert!(!stack.is_empty());
        assert!(core::ptr::eq(err.stack_trace().expect("full stack"), stack));
    }

    #[test]
    fn test_nested_wrap_is_abbreviated() {
        let err = outer();
        let own = err.stack().expect("captured");
        let full = err.stack_trace().expect("full stack");

        assert!(own.is_abbreviated());
        assert!(!full.is_abbreviated());
        assert!(own.len() < full.len());

        let cause = err.inner().and_then(|e| e.downcast_ref::<Annotated>()).expect("node");
        assert!(core::ptr::eq(cause.stack().expect("captured"), full));
    }

    #[test]
    fn test_with_message_adds_no_stack() {
        let err = with_message(inner(), "context");
        assert!(err.stack().is_none());
        assert!(err.stack_trace().is_some());
    }

    #[test]
    fn test_unrelated_cause_keeps_full_stack() {
        let err = wrap(fmt::Error, "formatting");
        let stack = err.stack().expect("captured");
        assert!(!stack.is_abbreviated());
        assert!(core::ptr::eq(err.stack_trace().expect("full stack"), stack));
    }

    #[test]
    fn test_join_stack_in_first_member() {
        let err = with_message(
            join([with_stack(fmt::Error), with_message(fmt::Error, "plain")]).expect("two members"),
            "top",
        );
        let first = member_stack(&err, 0).expect("captured");
        assert!(core::ptr::eq(err.stack_trace().expect("found"), first));
    }

    #[test]
    fn test_join_stack_in_second_member() {
        let err = with_message(
            join([with_message(fmt::Error, "plain"), with_stack(fmt::Error)]).expect("two members"),
            "top",
        );
        assert!(member_stack(&err, 0).is_none());
        let second = member_stack(&err, 1).expect("captured");
        assert!(core::ptr::eq(err.stack_trace().expect("found"), second));
    }

    #[test]
    fn test_extended_form_headers() {
        let text = format!("{:?}", outer());
        let full = text.find("inner >>>\n\tSTACK TRACE:\n").expect("full header");
        let abbr = text.find("outer >>>\n\tSTACK TRACE (abbr.):\n").expect("abbreviated header");
        assert!(full < abbr);
    }
}

#[cfg(not(feature = "backtrace"))]
#[test]
fn test_no_stacks_without_backtrace() {
    let err = wrap(new("inner"), "outer");
    assert!(err.stack().is_none());
    assert!(err.stack_trace().is_none());
    assert!(member_stack(&err, 0).is_none());
    assert_eq!(format!("{err:?}"), "inner >>>\nouter >>>");
}
