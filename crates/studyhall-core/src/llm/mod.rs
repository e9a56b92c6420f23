//! Generation service port: provider trait, dyn wrapper, retry client.

pub mod box_generator;
pub mod client;
pub mod generator;

pub use box_generator::BoxTextGenerator;
pub use client::GenerationClient;
pub use generator::TextGenerator;
