pub mod scroll;
pub mod viewport;
pub mod window;
