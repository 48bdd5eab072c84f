//! Feature-gated tracing macros.
//!
//! With the `tracing` feature enabled these forward to `tracing`; without it
//! they expand to a no-op that still borrows every argument, so call sites
//! need no `#[cfg]` of their own.

macro_rules! schema_debug {
    ($($field:ident = $value:expr),* ; $msg:literal) => {{
        #[cfg(feature = "tracing")]
        tracing::debug!($($field = %$value,)* $msg);
        #[cfg(not(feature = "tracing"))]
        { $(let _ = &$value;)* }
    }};
}

macro_rules! schema_warn {
    ($($field:ident = $value:expr),* ; $msg:literal) => {{
        #[cfg(feature = "tracing")]
        tracing::warn!($($field = %$value,)* $msg);
        #[cfg(not(feature = "tracing"))]
        { $(let _ = &$value;)* }
    }};
}

pub(crate) use schema_debug;
pub(crate) use schema_warn;
