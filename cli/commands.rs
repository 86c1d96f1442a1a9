pub mod consolidate;
pub mod plan;
