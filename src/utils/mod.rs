//! Utility types and functions used throughout the runtime.
//!
//! # Contents
//!
//! - [`CatchUnwind`]: Future wrapper for catching panics

mod catch_unwind;

pub(crate) use self::catch_unwind::CatchUnwind;
