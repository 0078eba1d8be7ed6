pub mod background;
pub mod catalog;
pub mod fields;
pub mod footprints;
pub mod graticule;
pub mod layer;
pub mod localization;
pub mod symbology;

pub use background::*;
pub use catalog::*;
pub use fields::*;
pub use footprints::*;
pub use graticule::*;
pub use layer::*;
pub use localization::*;
pub use symbology::*;
