#![deny(
    missing_docs,
    unsafe_code,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]

//! Tracing integration for errnote.
//!
//! This crate connects [`errnote`] errors with [`tracing`] in both directions:
//!
//! - [`SpanExt`] stores the active span scope on an error as data, so it
//!   survives after the spans have closed.
//! - [`LogExt`] emits a structured event for an error, with the merged data of
//!   its whole chain as a field.
//!
//! # Quick Start
//!
//! ```
//! use errnote::{Annotated, new};
//! use errnote_tracing::{ErrnoteLayer, LogExt, SpanExt};
//! use tracing_subscriber::{Registry, layer::SubscriberExt};
//!
//! // 1. Set up tracing with ErrnoteLayer (required for span fields)
//! let subscriber = Registry::default()
//!     .with(ErrnoteLayer) // Captures span field values for errors
//!     .with(tracing_subscriber::fmt::layer()); // Your normal console output
//! tracing::subscriber::set_global_default(subscriber).expect("failed to set subscriber");
//!
//! // 2. Record spans on errors and log them
//! #[tracing::instrument(fields(user_id = 42))]
//! fn example() -> Result<(), Annotated> {
//!     Err(new("something went wrong")).with_span_data()
//! }
//!
//! let err = example().log_error().unwrap_err();
//! assert_eq!(
//!     err.get_value("span").map(|v| v.to_string()).as_deref(),
//!     Some("example{user_id=42}")
//! );
//! ```
//!
//! # Environment Variables
//!
//! - `ERRNOTE_TRACING` - Comma-separated options:
//!   - `leafs` - Only record spans on errors without a cause

use std::{error::Error, fmt, sync::OnceLock};

use errnote::{Annotated, KvPairs, chain};
use tracing::{
    Span,
    field::{Field, Visit},
};
use tracing_subscriber::{Registry, registry::LookupSpan};

/// The data key the span scope is stored under.
pub const SPAN_KEY: &str = "span";

/// Captured field values for a span.
#[derive(Clone)]
struct CapturedFields(String);

struct FieldVisitor<'a> {
    output: &'a mut String,
}

impl Visit for FieldVisitor<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        use std::fmt::Write;
        if !self.output.is_empty() {
            self.output.push(' ');
        }
        let _ = write!(self.output, "{}={:?}", field.name(), value);
    }
}

/// A tracing layer that captures span field values for errors.
///
/// **Required for [`SpanExt`] to show span fields.** Add this to your
/// subscriber alongside your other layers. Without it, spans are recorded by
/// name only.
///
/// # Examples
///
/// ```
/// use errnote_tracing::ErrnoteLayer;
/// use tracing_subscriber::{Registry, layer::SubscriberExt};
///
/// let subscriber = Registry::default()
///     .with(ErrnoteLayer) // Captures span data for errors
///     .with(tracing_subscriber::fmt::layer()); // Example: console output
///
/// tracing::subscriber::set_global_default(subscriber).expect("failed to set subscriber");
/// ```
#[derive(Copy, Clone, Debug, Default)]
pub struct ErrnoteLayer;

impl<S> tracing_subscriber::Layer<S> for ErrnoteLayer
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        id: &tracing::span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut buf = String::new();
        attrs.record(&mut FieldVisitor { output: &mut buf });
        span.extensions_mut().insert(CapturedFields(buf));
    }

    fn on_record(
        &self,
        id: &tracing::span::Id,
        values: &tracing::span::Record<'_>,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut extensions = span.extensions_mut();
        if let Some(fields) = extensions.get_mut::<CapturedFields>() {
            values.record(&mut FieldVisitor {
                output: &mut fields.0,
            });
        }
    }
}

#[derive(Debug)]
struct ErrnoteTracingEnvOptions {
    span_leafs_only: bool,
}

impl ErrnoteTracingEnvOptions {
    fn get() -> &'static Self {
        static ERRNOTE_TRACING_FLAGS: OnceLock<ErrnoteTracingEnvOptions> = OnceLock::new();

        ERRNOTE_TRACING_FLAGS.get_or_init(|| {
            let mut span_leafs_only = false;

            if let Some(var) = std::env::var_os("ERRNOTE_TRACING") {
                for v in var.to_string_lossy().split(',') {
                    if v.eq_ignore_ascii_case("leafs") {
                        span_leafs_only = true;
                    }
                }
            }

            ErrnoteTracingEnvOptions { span_leafs_only }
        })
    }
}

/// Formats the scope of the current span, outermost first, as
/// `outer{a=1} > inner`.
///
/// Returns `None` when there is no current span or the subscriber is not
/// built on a [`Registry`].
pub fn current_span_scope() -> Option<String> {
    let span = Span::current();
    span.with_subscriber(|(span_id, dispatch)| {
        let registry = dispatch.downcast_ref::<Registry>()?;
        let span_ref = registry.span(span_id)?;

        let mut out = String::new();
        for ancestor in span_ref.scope().from_root() {
            if !out.is_empty() {
                out.push_str(" > ");
            }
            out.push_str(ancestor.name());
            if let Some(fields) = ancestor.extensions().get::<CapturedFields>()
                && !fields.0.is_empty()
            {
                out.push('{');
                out.push_str(&fields.0);
                out.push('}');
            }
        }
        Some(out)
    })
    .flatten()
}

/// Records the current span scope on an error.
///
/// The scope is stored as a `String` under [`SPAN_KEY`], formatted like
/// [`current_span_scope`]. Nothing is stored outside of a span, or, with
/// `ERRNOTE_TRACING=leafs`, on errors that wrap another error.
///
/// # Examples
///
/// ```
/// use errnote::Annotated;
/// use errnote_tracing::SpanExt;
///
/// #[tracing::instrument]
/// fn might_fail() -> Result<(), Annotated> {
///     Err(errnote::new("operation failed")).with_span_data()
/// }
///
/// let result = might_fail();
/// ```
pub trait SpanExt: Sized {
    /// Records the current span scope on the error.
    fn with_span_data(self) -> Self;
}

impl SpanExt for Annotated {
    fn with_span_data(mut self) -> Self {
        if ErrnoteTracingEnvOptions::get().span_leafs_only && self.inner().is_some() {
            return self;
        }
        if let Some(scope) = current_span_scope() {
            self.set_data(KvPairs::from([(SPAN_KEY, scope)]));
        }
        self
    }
}

impl<T> SpanExt for Result<T, Annotated> {
    fn with_span_data(self) -> Self {
        self.map_err(SpanExt::with_span_data)
    }
}

/// Emits errors as structured tracing events.
///
/// The event carries three fields: `error` (the short form), `data` (the
/// merged data of the whole chain) and `cause` (the deepest cause). The event
/// message is the outermost message. The value is returned unchanged.
///
/// # Examples
///
/// ```
/// use errnote::{ResultExt, kv};
/// use errnote_tracing::LogExt;
///
/// let result: Result<u16, _> = "http"
///     .parse::<u16>()
///     .wrap_with_data("invalid port", kv! { "input" => "http" })
///     .log_warn();
/// assert!(result.is_err());
/// ```
pub trait LogExt: Sized {
    /// Emits an `ERROR` event for the error, if any.
    fn log_error(self) -> Self;

    /// Emits a `WARN` event for the error, if any.
    fn log_warn(self) -> Self;
}

fn emit(err: &(dyn Error + 'static), as_error: bool) {
    let data = chain::get_all_data(err);
    let cause = chain::cause(err);
    if as_error {
        tracing::error!(error = %err, data = %data, cause = %cause, "{err:#}");
    } else {
        tracing::warn!(error = %err, data = %data, cause = %cause, "{err:#}");
    }
}

impl LogExt for Annotated {
    fn log_error(self) -> Self {
        emit(&self, true);
        self
    }

    fn log_warn(self) -> Self {
        emit(&self, false);
        self
    }
}

impl<T, E> LogExt for Result<T, E>
where
    E: Error + 'static,
{
    fn log_error(self) -> Self {
        if let Err(err) = &self {
            emit(err, true);
        }
        self
    }

    fn log_warn(self) -> Self {
        if let Err(err) = &self {
            emit(err, false);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use errnote::{kv, new, with_data, wrap};
    use tracing_subscriber::{Layer, layer::SubscriberExt};

    use super::*;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<String>>>);

    impl<S: tracing::Subscriber> Layer<S> for Capture {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            let mut line = format!("{} ", event.metadata().level());
            event.record(&mut FieldVisitor { output: &mut line });
            self.0.lock().expect("capture lock").push(line);
        }
    }

    fn with_capture<R>(f: impl FnOnce() -> R) -> (R, Vec<String>) {
        let capture = Capture::default();
        let subscriber = Registry::default().with(ErrnoteLayer).with(capture.clone());
        let result = tracing::subscriber::with_default(subscriber, f);
        let lines = capture.0.lock().expect("capture lock").clone();
        (result, lines)
    }

    #[test]
    fn test_span_scope_outermost_first() {
        let (err, _) = with_capture(|| {
            tracing::info_span!("outer", a = 1).in_scope(|| {
                tracing::info_span!("inner").in_scope(|| new("failed").with_span_data())
            })
        });
        assert_eq!(
            err.get_value(SPAN_KEY).map(ToString::to_string).as_deref(),
            Some("outer{a=1} > inner")
        );
    }

    #[test]
    fn test_recorded_fields_are_appended() {
        let (scope, _) = with_capture(|| {
            let span = tracing::info_span!("request", id = 7, user = tracing::field::Empty);
            span.record("user", "alice");
            span.in_scope(current_span_scope)
        });
        assert_eq!(scope.as_deref(), Some("request{id=7 user=\"alice\"}"));
    }

    #[test]
    fn test_inner_span_replaces_outer_scope() {
        let (err, _) = with_capture(|| {
            let err = tracing::info_span!("first").in_scope(|| new("failed").with_span_data());
            tracing::info_span!("second", n = 2).in_scope(|| err.with_span_data())
        });
        assert_eq!(
            err.data().and_then(|data| data.get(SPAN_KEY)).map(ToString::to_string).as_deref(),
            Some("second{n=2}")
        );
        assert_eq!(err.data().map(KvPairs::len), Some(1));
    }

    #[test]
    fn test_no_span_no_data() {
        let (err, _) = with_capture(|| new("failed").with_span_data());
        assert!(err.get_value(SPAN_KEY).is_none());
    }

    #[test]
    fn test_log_error_fields() {
        let (result, lines) = with_capture(|| {
            let err = wrap(with_data(new("disk full"), kv! { "device" => "sda" }), "saving");
            Err::<(), _>(err).log_error()
        });
        assert!(result.is_err());
        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0],
            "ERROR message=saving error=saving: disk full data={device:sda} cause=disk full"
        );
    }

    #[test]
    fn test_log_ok_is_silent() {
        let (_, lines) = with_capture(|| Ok::<_, Annotated>(1).log_warn());
        assert!(lines.is_empty());
    }

    #[derive(Debug, thiserror::Error)]
    #[error("request failed")]
    struct RequestError(#[source] Annotated);

    #[test]
    fn test_log_foreign_error_reaches_data() {
        let (_, lines) = with_capture(|| {
            let inner = with_data(new("timeout"), kv! { "ms" => 500 });
            Err::<(), _>(RequestError(inner)).log_warn()
        });
        assert_eq!(
            lines,
            ["WARN message=request failed error=request failed data={ms:500} cause=timeout"]
        );
    }
}
