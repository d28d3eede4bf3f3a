#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Shared utilities for rulegen.
//!
//! Pure filesystem helpers with no logging dependencies; the CLI owns
//! logging and the core decides what a failed read means.

pub mod fs;
