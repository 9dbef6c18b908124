pub mod brew;
pub mod calc;
pub mod config;
pub mod phases;
