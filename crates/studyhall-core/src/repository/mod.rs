//! Repository trait definitions for the non-chat domain entities.

pub mod course;
pub mod note;
pub mod user;
