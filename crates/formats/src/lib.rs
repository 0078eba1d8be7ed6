pub mod error;
pub mod feature_collection;
pub mod instrument;
pub mod manifest;
pub mod package;

pub use error::*;
pub use feature_collection::*;
pub use instrument::*;
pub use manifest::*;
pub use package::*;
