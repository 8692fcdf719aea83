pub mod diff;
pub mod event;
pub mod level;
pub mod replay;
pub mod step;
pub mod stop;
pub mod world;
