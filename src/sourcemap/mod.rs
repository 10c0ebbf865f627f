mod append;
mod map;
mod raw;

pub use map::*;
