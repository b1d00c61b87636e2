//! Text processing and scoring module

pub mod stop_words;
pub mod text_processor;
pub mod tfidf;
pub mod ats_matcher;
