//! Resume screener library
//!
//! Resume/job matching engine for a job-board platform: text extraction from
//! uploaded resume files, heuristic entity extraction, weighted match scoring,
//! and orchestration between a remote AI analysis service and the local
//! pipeline.

pub mod config;
pub mod error;
pub mod input;
pub mod orchestrator;
pub mod processing;
pub mod remote;

pub use config::Config;
pub use error::{Result, ScreenerError};
pub use orchestrator::{AnalysisOrchestrator, AnalysisOutcome, JobRef, JobStore};
pub use processing::entities::{EntityExtractor, ResumeProfile};
pub use processing::scorer::{JobPosting, MatchResult, MatchScorer};
