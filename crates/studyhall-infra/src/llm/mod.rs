//! Generation backends: the Gemini HTTP client and the offline mock.

pub mod gemini;
pub mod mock;
