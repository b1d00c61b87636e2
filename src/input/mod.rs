//! Input processing module
//! Handles file detection, text extraction, and JSON score requests

pub mod file_detector;
pub mod text_extractor;
pub mod manager;
pub mod request;
