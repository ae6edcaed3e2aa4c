//! Transport-level primitives used by the prober.

pub mod tcp;
