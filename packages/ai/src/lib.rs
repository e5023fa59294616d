// ABOUTME: Generative model integration
// ABOUTME: Gemini client plus the TextGenerator seam used by epic generation

pub mod service;

pub use service::{
    strip_code_fences, AIResponse, AIServiceError, AIServiceResult, GeminiService,
    TextGenerator, Usage, DEFAULT_API_BASE, DEFAULT_MODEL,
};
