pub mod data;
pub mod signal;
pub mod spec;
pub mod task_graph;
pub mod variable;

pub use vegascale_common::error;
