pub mod catalog;
pub mod contour;
pub mod display;
pub mod feature;
pub mod footprint;
pub mod instrument;
pub mod selection;
pub mod view;

pub use catalog::*;
pub use contour::*;
pub use display::*;
pub use feature::*;
pub use footprint::*;
pub use instrument::*;
pub use selection::*;
pub use view::*;
