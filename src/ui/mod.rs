pub mod controls;
pub mod plot_panel;
pub mod tooltip;
