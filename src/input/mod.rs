//! Input processing module
//! Handles file detection and text extraction from uploaded resumes

pub mod file_detector;
pub mod text_extractor;
