//! Internal utilities for the Tonestrip audio engine.
//!
//! Low-level helpers shared between `tonestrip-core` and the engine crate.
//! Everything here is `const fn` where possible and has zero external
//! dependencies.
//!
//! # Contents
//!
//! - [`fnv1a_32`] - FNV-1a hash used to derive numeric parameter ids from string keys

pub mod hash;

pub use hash::fnv1a_32;
