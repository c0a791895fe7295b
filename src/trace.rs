//! Tracing hooks for engine decisions and per-scale detail.
//!
//! With the `tracing` feature every hook forwards to the `tracing` crate under
//! the `clickmatch` target; without it they compile to nothing. Events carry
//! their name as the message so a plain `fmt` subscriber prints it. Facade
//! decisions are emitted at info level, per-scale results at debug level.

/// Info-level span around a match call or an engine search.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::info_span!(target: "clickmatch", $name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        $crate::trace::NoopSpan
    };
}

/// Info-level event for engine selection and final outcomes.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:expr $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::info!(target: "clickmatch", $($key = $value,)* "{}", $name)
    };
}

/// Debug-level event for per-scale bests and exclusions.
#[cfg(feature = "tracing")]
macro_rules! trace_detail {
    ($name:expr $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::debug!(target: "clickmatch", $($key = $value,)* "{}", $name)
    };
}

// Values are still evaluated so call sites do not trip unused-variable lints.
#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:expr $(, $key:ident = $value:expr)* $(,)?) => {
        let _ = ($name, $($value,)*);
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_detail {
    ($name:expr $(, $key:ident = $value:expr)* $(,)?) => {
        let _ = ($name, $($value,)*);
    };
}

pub(crate) use trace_detail;
pub(crate) use trace_event;
pub(crate) use trace_span;

/// Guard returned by `trace_span!` when tracing is compiled out.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}
