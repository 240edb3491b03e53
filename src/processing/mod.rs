//! Text analysis module
//! Lexicon matching, entity extraction, and job match scoring

pub mod lexicon;
pub mod entities;
pub mod scorer;
