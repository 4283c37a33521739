use std::path::PathBuf;

use thiserror::Error;

/// Raster construction failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RasterError {
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("raster must have at least one channel")]
    NoChannels,

    #[error("raster of {width}x{height}x{channels} samples does not fit in memory")]
    TooLarge { width: usize, height: usize, channels: usize },
}

/// Precondition failures of the land-cover classifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("image must have 3 colour channels (RGB), got {channels}")]
    InvalidImageFormat { channels: usize },

    #[error("image contains no pixels")]
    EmptyImage,
}

/// A category table loaded from configuration was rejected.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("invalid category table JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("category table is empty")]
    Empty,

    #[error("duplicate category name `{0}`")]
    DuplicateName(String),

    #[error("category `{name}`: lower bound exceeds upper bound on channel {channel}")]
    InvertedBounds { name: String, channel: usize },

    #[error("category `{name}`: hue bound {hue} is outside 0-180")]
    HueOutOfRange { name: String, hue: u8 },
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Raster(#[from] RasterError),
}

/// Field-observation validation failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ObservationError {
    #[error("cannot parse location `{0}`, expected \"lat,lon\" or \"lat lon\"")]
    BadLocation(String),

    #[error("latitude {0} is outside -90..=90")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside -180..=180")]
    LongitudeOutOfRange(f64),

    #[error("rain intensity {0} is outside 1..=10")]
    IntensityOutOfRange(u8),

    #[error("temperature {0} °C is outside -10..=50")]
    TemperatureOutOfRange(f64),

    #[error("sighting count must be at least 1")]
    ZeroCount,

    #[error("unknown {field} `{value}`")]
    UnknownVariant { field: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt record in {path} line {line}: {source}")]
    Corrupt {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid collection name `{0}`")]
    BadCollection(String),

    #[error("documents must be JSON objects")]
    NotAnObject,

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("invalid feed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("field id must be between 1 and 8, got {0}")]
    BadField(u8),
}
