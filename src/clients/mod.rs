pub mod evaluate_client;

pub use evaluate_client::{EvaluateClient, EvaluationRequest, EvaluationResponse};
