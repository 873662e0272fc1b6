pub mod constants;
pub mod frame;
pub mod orientation;
pub mod rect;
