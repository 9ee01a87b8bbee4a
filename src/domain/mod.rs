pub mod grid;
pub mod heading;
pub mod rules;
