//! Public API surface for the dashboard.
//!
//! This file consolidates the types that cross the HTTP boundary.
//! All types derive Serialize (and Deserialize where they are accepted as input).

pub use crate::models::{CoordinateQuality, GeoPoint, Record};
pub use crate::render::map::{Indicator, MapMode};
pub use crate::render::map_commands::MapCommand;
pub use crate::services::aggregate::{
    AggregateBundle, CoordinateTally, DateSpan, Hemispheres, LabelAverage, LabelCount, Matrix,
    SamplePoint,
};
pub use crate::services::coverage::{CoverageReport, GeocodePresence, KeyCount, LocationKey};
pub use crate::services::dashboard::{ChartFailure, PassReport};
pub use crate::services::filter::{Dimension, FilterState, FilterUpdate, ToggleOutcome};
