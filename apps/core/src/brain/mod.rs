//! # Brain Module
//!
//! Deterministic question answering for the research workspace.
//! Maps a free-text governance question to a cited, canned answer.
//!
//! ## Components
//! - `intent`: ordered keyword rules assigning a `Topic` (first match wins)
//! - `sources`: static Source Directory and keyword search
//! - `answers`: canned answer table
//! - `composer`: main orchestrator producing a `ComposedAnswer`

pub mod answers;
pub mod composer;
pub mod intent;
pub mod sources;

pub use answers::{CannedAnswer, MessageType};
pub use composer::{ComposedAnswer, ResponseComposer};
pub use intent::{IntentClassifier, Topic};
pub use sources::{SourceDirectory, SourceEntry, SourceLink};
