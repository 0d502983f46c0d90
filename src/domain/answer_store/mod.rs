//! Answer store domain - key-value storage for answer bodies

mod repository;

pub use repository::AnswerStore;
#[cfg(test)]
pub use repository::MockAnswerStore;
