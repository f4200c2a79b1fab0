//! Test Module
//!
//! Test suite for the HOA assistant backend.
//!
//! ## Test Categories
//! - `brain_tests`: Topic classification, answer composition, source search
//! - `session_tests`: Conversation session state machine
//! - `supervisor_tests`: Session supervisor timing, cancellation and persistence
//! - `database_tests`: CRUD operations for conversations, messages, documents, templates
//! - `integration_tests`: Full HTTP workflows through the router

pub mod brain_tests;
pub mod database_tests;
