pub mod llm;
pub mod extraction;
pub mod audit;
pub mod processor;
