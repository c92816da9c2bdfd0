pub mod compose;
pub mod quiz;
pub mod screen_ops;
pub mod tags;
