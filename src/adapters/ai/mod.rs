//! Model adapters. Implement SummarizerPort, ClassifierPort and TranscriberPort.
//!
//! Provides a Hugging Face inference adapter and mock adapters for testing.

pub mod huggingface_adapter;
pub mod mock_adapter;

pub use huggingface_adapter::{HfModels, HuggingFaceAdapter};
pub use mock_adapter::{MockClassifier, MockSummarizer, MockTranscriber};
