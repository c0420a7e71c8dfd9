pub mod chart_state;
pub mod context;
pub mod facet;
pub mod registry;
pub mod scale;
