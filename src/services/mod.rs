pub mod extraction_service;
pub mod normalizer;
pub mod prompts;
pub mod repair;
pub mod topic_service;
pub mod validation;

pub use extraction_service::{ExtractionPlan, ExtractionService};
pub use topic_service::{MaterialFile, TopicService};
