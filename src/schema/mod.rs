pub mod common;
pub mod promotion;
