//! CLI module for grocer - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for item configuration,
//! quotient inspection, list generation and previews.

pub mod commands;

pub use commands::Cli;
