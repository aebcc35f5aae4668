//! barsim: historical bar-replay backtester.
//!
//! Hexagonal architecture: the replay engine and its accounting live in
//! [`domain`], collaborator traits in [`ports`], file-backed implementations
//! in [`adapters`], and process startup in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
