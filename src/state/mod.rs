//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `VisitedSet`: normalized URLs already taken from the frontier
//! - `OriginPolicy`: per-origin robots rules and request timestamps

mod origin_state;
mod visited;

// Re-export main types
pub use origin_state::OriginPolicy;
pub use visited::VisitedSet;
