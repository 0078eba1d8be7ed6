pub mod frame;
pub mod picking;
pub mod primitive;

pub use frame::*;
pub use picking::*;
pub use primitive::*;
