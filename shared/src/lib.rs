pub mod colors;
pub mod join;
pub mod region;
pub mod scale;
pub mod stats;
pub mod topology;

pub use colors::Rgb;
pub use join::{JoinedRegion, JoinedView, StatIndex, StatMatch, join};
pub use region::{Geometry, Region, RegionId, Ring};
pub use scale::{
    ClassificationScale, ConfigurationError, LegendAxis, education_breaks, education_scale,
};
pub use stats::{RegionLabel, StatRecord};
pub use topology::{Topology, TopologyError};
