pub mod common;
pub mod open;
pub mod wait;
