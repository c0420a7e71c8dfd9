pub mod graph;
pub mod scale_state;
pub mod scope;
