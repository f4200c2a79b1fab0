//! HOA governance research assistant backend.
//!
//! The core question/answer path is pure and deterministic: the
//! [`brain`] module classifies a question and composes a canned, cited
//! answer; [`session`] holds the per-conversation state machine; the
//! [`actors`] supervisor runs sessions and talks to persistence. The
//! [`server`] module exposes everything over HTTP.

pub mod actors;
pub mod brain;
pub mod config;
pub mod database;
pub mod drafting;
pub mod error;
pub mod fs_manager;
pub mod library;
pub mod logging;
pub mod markup;
pub mod models;
pub mod server;
pub mod session;
pub mod uploads;

#[cfg(test)]
mod tests;
