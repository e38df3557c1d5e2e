pub mod features;
pub mod geo;
pub mod initializer;
pub mod layers;
pub mod map;
pub mod markers;
pub mod source;

use crate::map::LayerId;

use thiserror::Error;

/// Element id the marker page embeds its FeatureCollection under.
pub const MARKER_DATA_ELEMENT: &str = "marker_data";

#[derive(Debug, Error)]
pub enum MapError {
    #[error("no element with id {0:?} in page")]
    MissingElement(String),
    #[error("invalid json: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid geojson: {0}")]
    InvalidGeoJson(String),
    #[error("expected a FeatureCollection, found a {0}")]
    NotAFeatureCollection(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("map was already initialized")]
    AlreadyInitialized,
    #[error("map has no layer group {0:?}")]
    UnknownLayer(LayerId),
    #[error("viewport {width}x{height} leaves no room for padding {padding:?}")]
    ViewportTooSmall {
        width: f64,
        height: f64,
        padding: (f64, f64),
    },
}

pub type MapResult<T> = Result<T, MapError>;
