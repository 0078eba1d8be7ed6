pub mod compositor;
pub mod config;
pub mod controller;
pub mod widget;

pub use compositor::*;
pub use config::*;
pub use controller::*;
pub use widget::*;
