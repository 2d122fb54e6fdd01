pub mod band;
pub mod health;
pub mod member;
pub mod practice;
pub mod schedule;
