//! Business logic and repository trait definitions for Studyhall.
//!
//! This crate defines the "ports" (repository traits) that the
//! infrastructure layer implements. It depends only on `studyhall-types`
//! -- never on `studyhall-infra` or any database/IO crate.

pub mod chat;
pub mod llm;
pub mod repository;
