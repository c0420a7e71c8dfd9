pub mod check;
pub mod equality;
