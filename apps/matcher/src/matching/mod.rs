//! Matching — skill extraction, similarity ranking, recommendations, and
//! the two request pipelines built on top of them.

pub mod pipeline;
pub mod recommend;
pub mod similarity;
pub mod skills;
