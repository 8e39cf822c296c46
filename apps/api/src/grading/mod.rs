pub mod evaluator;
pub mod feedback;
pub mod handlers;
pub mod prompts;
pub mod service;
pub mod view;
