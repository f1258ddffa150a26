pub mod matrix;
pub mod predict;
