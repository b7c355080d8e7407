pub mod analyzer;
pub mod config;
pub mod errors;
pub mod extract;
pub mod gender;
pub mod judge;
pub mod model;
pub mod segment;
pub mod source;
pub mod topic;

pub use analyzer::BechdelAnalyzer;
pub use errors::BechdelError;
pub use model::{AnalysisResult, Conversation, Gender, Speaker};
