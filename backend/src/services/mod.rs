//! Service layer: aggregation, filtering, dataset maintenance and the
//! dashboard orchestrator that ties them to the renderers.

pub mod aggregate;
pub mod categorical;
pub mod coverage;
pub mod dashboard;
pub mod delay;
pub mod filter;
pub mod geo;
pub mod temporal;

pub use aggregate::{aggregate, AggregateBundle, LabelCount, Matrix};
pub use coverage::{
    apply_location_fills, coverage_report, geocode_presence, missing_location_keys,
    CoverageReport, GeocodePresence, LocationKey,
};
pub use dashboard::{chart_ids, load_dataset, Dashboard, LoadedDataset, PassReport};
pub use filter::{CrossFilterTable, Dimension, FilterState, FilterUpdate, ToggleOutcome};
