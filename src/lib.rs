//! Command-line front end for the autoform HOTP primitives.

pub mod cli;
