//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `storage` - Key-value persistence (file, in-memory)
//! - `ai` - Text generation (Gemini, mock)

pub mod ai;
pub mod storage;

pub use ai::{GeminiConfig, GeminiProvider, MockAIProvider};
pub use storage::{FileKeyValueStore, InMemoryKeyValueStore};
