pub mod details;
pub mod menu_bar;
pub mod preview;
pub mod status_bar;
pub mod tree;
