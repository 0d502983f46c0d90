//! API request, response and error types

pub mod assistant;
pub mod error;
pub mod json;

pub use assistant::{
    AnswerResponse, CacheStatsResponse, ChatRequest, EvaluateRequest, ProjectChatRequest,
};
pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
