//! Land-cover analysis for drone imagery, plus the record types and feed
//! parsing used by the field-monitoring tools.
//!
//! Pipeline for an uploaded photo:
//!   decode bytes → [`Raster`] → HSV per pixel → count per [`Category`] →
//!   [`Classification`] (percent of pixels per category, table order).

pub mod category;
pub mod classify;
pub mod decode;
pub mod error;
pub mod hsv;
pub mod observation;
pub mod raster;
pub mod stats;
pub mod store;
pub mod telemetry;

pub use category::{Category, CategoryTable, HsvRange};
pub use classify::{classify, Classification, CoverShare, LandCoverClassifier};
pub use error::{
    ClassifyError, DecodeError, FeedError, ObservationError, RasterError, StoreError, TableError,
};
pub use hsv::{rgb_to_hsv, Hsv};
pub use raster::Raster;
pub use stats::{channel_means, ChannelMeans};
