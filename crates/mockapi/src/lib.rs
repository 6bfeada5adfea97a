//! MockAPI command-line application.
//!
//! Serves a dataset over HTTP and offers a few maintenance commands for the
//! data file.

pub mod cli;
pub mod commands;
