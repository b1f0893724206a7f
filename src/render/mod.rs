pub mod axis;
pub mod color;
pub mod engine;
pub mod scale;
pub mod transition;
