pub mod capture;
pub mod llm_service;
pub mod locator;
pub mod response_parser;

pub use llm_service::{LlmService, VisionClassifier};
