pub mod chart;
pub mod data;
pub mod mark;
pub mod scale;
pub mod signal;
pub mod transform;
pub mod values;
pub mod visitors;
