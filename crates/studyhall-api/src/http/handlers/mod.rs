//! HTTP request handlers.

pub mod admin;
pub mod analytics;
pub mod auth;
pub mod chat;
pub mod course;
pub mod note;
