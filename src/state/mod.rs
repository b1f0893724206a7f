pub mod selection;
pub mod theme;
