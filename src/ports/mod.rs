//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `KeyValueStore` - Persistence of the cycle, entries and insight blobs
//! - `AIProvider` - Hosted text generation for feedback and reports

mod ai_provider;
mod key_value_store;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    RequestMetadata, ResponseFormat, TokenUsage,
};
pub use key_value_store::{KeyValueStore, StorageError, StorageKeys};
