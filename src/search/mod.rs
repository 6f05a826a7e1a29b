//! Free-text waypoint search: markup stripping and the matching engine.

pub mod engine;
pub mod markup;

pub use engine::search;
pub use markup::strip_markup;
