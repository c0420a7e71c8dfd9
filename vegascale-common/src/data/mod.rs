pub mod scalar;
pub mod table;
