pub mod buffer;
pub mod clock;
pub mod event;
pub mod food;
pub mod save;
pub mod step;
pub mod world;
