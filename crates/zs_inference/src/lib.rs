pub mod chunker;
pub mod client;
pub mod error;
pub mod logging;
pub mod models;
pub mod prompts;
pub mod reduce;
pub mod sanitize;

pub use chunker::{split_into_chunks, Chunk};
pub use client::{ClientConfig, RetryPolicy, SummaryClient};
pub use error::SummaryError;
pub use models::{create_model, InferenceConfig, ModelKind};
pub use reduce::{Reduction, ReductionConfig, ReductionEngine, ReductionOutcome};
pub use sanitize::{sanitize, sanitize_response};

pub mod prelude {
    pub use super::client::{ClientConfig, RetryPolicy, SummaryClient};
    pub use super::logging::{init_logging, Logger};
    pub use super::models::{create_model, InferenceConfig, ModelKind};
    pub use super::reduce::{Reduction, ReductionConfig, ReductionEngine, ReductionOutcome};
    pub use super::SummaryError;
    pub use zs_core::{CompletionModel, Error, Result};
}
