//! BoxTextGenerator -- object-safe dynamic dispatch wrapper for TextGenerator.
//!
//! The concrete backend (live Gemini client vs offline mock) is chosen at
//! startup from configuration, so the service layer needs a single type
//! that can hold either. `TextGenerator` uses RPITIT and cannot be a
//! trait object directly:
//! 1. Define an object-safe `TextGeneratorDyn` trait with boxed futures
//! 2. Blanket-impl `TextGeneratorDyn` for all `T: TextGenerator`
//! 3. `BoxTextGenerator` wraps `Box<dyn TextGeneratorDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use studyhall_types::llm::{GenerationError, PromptTurn};

use super::generator::TextGenerator;

/// Object-safe version of [`TextGenerator`] with boxed futures.
pub trait TextGeneratorDyn: Send + Sync {
    fn generate_boxed<'a>(
        &'a self,
        turns: &'a [PromptTurn],
    ) -> Pin<Box<dyn Future<Output = Result<String, GenerationError>> + Send + 'a>>;
}

/// Blanket implementation: any `TextGenerator` automatically implements
/// `TextGeneratorDyn`.
impl<T: TextGenerator> TextGeneratorDyn for T {
    fn generate_boxed<'a>(
        &'a self,
        turns: &'a [PromptTurn],
    ) -> Pin<Box<dyn Future<Output = Result<String, GenerationError>> + Send + 'a>> {
        Box::pin(self.generate(turns))
    }
}

/// Type-erased generation backend for runtime selection.
pub struct BoxTextGenerator {
    inner: Box<dyn TextGeneratorDyn + Send + Sync>,
}

impl BoxTextGenerator {
    /// Wrap a concrete `TextGenerator` in a type-erased box.
    pub fn new<T: TextGenerator + 'static>(generator: T) -> Self {
        Self {
            inner: Box::new(generator),
        }
    }
}

impl TextGenerator for BoxTextGenerator {
    async fn generate(&self, turns: &[PromptTurn]) -> Result<String, GenerationError> {
        self.inner.generate_boxed(turns).await
    }
}
