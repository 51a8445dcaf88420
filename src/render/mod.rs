pub mod color;
pub mod layout;
pub mod scene;
pub mod svg;
pub mod tooltip;
