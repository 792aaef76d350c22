pub mod promotion;
pub mod promotion_filter;
