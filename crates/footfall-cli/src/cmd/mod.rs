pub mod collect;
pub mod completions;
pub mod status;
