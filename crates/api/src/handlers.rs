pub mod band;
pub mod member;
pub mod practice;
pub mod schedule;
