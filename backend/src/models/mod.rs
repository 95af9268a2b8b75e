pub mod coordinates;
pub mod record;
pub mod time;

pub use coordinates::{classify, CoordinateQuality, GeoPoint, PlaceholderLocation, RawCoordinates};
pub use record::{Record, UNKNOWN_SHAPE, UNSPECIFIED_COUNTRY};
