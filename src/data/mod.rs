pub mod attribute;
pub mod loader;
pub mod observation;
