//! Shared domain types for Studyhall.
//!
//! This crate contains the core domain types used across the Studyhall
//! platform: users, study sessions, chat messages, courses, notes, and
//! their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod course;
pub mod error;
pub mod llm;
pub mod note;
pub mod user;
