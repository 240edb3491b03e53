//! Remote AI analysis service integration

pub mod connector;
