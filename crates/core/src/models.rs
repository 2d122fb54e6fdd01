pub mod band;
pub mod grid;
pub mod member;
