pub mod db;
pub mod promotion;
