// Resume evaluation: text extraction, embedding similarity, keyword coverage.
// The model and the job profile are built once at startup and shared read-only.

pub mod evaluator;
pub mod extract;
pub mod handlers;
pub mod keywords;
pub mod profile;
pub mod similarity;
