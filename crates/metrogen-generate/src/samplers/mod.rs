//! Leaf samplers: one [`Location`](metrogen_core::Location) or one geometry
//! payload per call.

pub mod feature;
pub mod location;

pub use feature::{sample_feature_data, sample_feature_data_by_name};
pub use location::sample_location;
