pub mod export;
pub mod pack;

pub use export::*;
pub use pack::*;
