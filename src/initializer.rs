use crate::features::popup_content;
use crate::geo::LatLngBounds;
use crate::layers::{LayerGroup, PopupOptions, RenderedFeature, TileLayer};
use crate::map::{FitBoundsOptions, MapWidget};
use crate::source::FeatureSource;
use crate::{MapError, MapResult};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

pub const POPUP_MIN_WIDTH: u32 = 256;
pub const FIT_PADDING: (f64, f64) = (30.0, 30.0);

/// Reserved for future settings; no key is recognized yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapOptions(pub serde_json::Map<String, serde_json::Value>);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InitReport {
    pub features: usize,
    pub popups: usize,
    /// Union of the rendered geometries, `None` if nothing had a position.
    pub bounds: Option<LatLngBounds>,
}

/// Sets up a map once: base tiles, a marker overlay filled from a
/// [`FeatureSource`], then a view fitted to the markers.
#[derive(Debug, Default)]
pub struct MapInitializer {
    options: MapOptions,
    initialized: bool,
}

impl MapInitializer {
    pub fn new(options: MapOptions) -> MapInitializer {
        MapInitializer {
            options,
            initialized: false,
        }
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Runs the setup. An initializer is spent after the first call, even a
    /// failed one, so a map never receives a second base layer.
    pub fn initialize<M: MapWidget + ?Sized>(
        &mut self,
        map: &mut M,
        source: &dyn FeatureSource,
    ) -> MapResult<InitReport> {
        if self.initialized {
            return Err(MapError::AlreadyInitialized);
        }
        self.initialized = true;

        for key in self.options.0.keys() {
            debug!("ignoring unrecognized map option {:?}", key);
        }

        map.add_tile_layer(TileLayer::openstreetmap());
        let overlay = map.add_layer_group(LayerGroup::new());

        let collection = source.load()?;
        let markers = map
            .layer_group_mut(overlay)
            .ok_or(MapError::UnknownLayer(overlay))?;

        let mut report = InitReport::default();
        for feature in collection.features {
            let content = popup_content(&feature).map(str::to_owned);
            let mut rendered = RenderedFeature::new(feature);
            if let Some(content) = content {
                rendered.bind_popup(
                    content,
                    PopupOptions {
                        min_width: POPUP_MIN_WIDTH,
                        ..PopupOptions::default()
                    },
                );
                report.popups += 1;
            }
            markers.add(rendered);
            report.features += 1;
        }
        report.bounds = markers.bounds();

        info!(
            "added {} features to the marker layer, {} with popups",
            report.features, report.popups
        );

        match &report.bounds {
            Some(bounds) => {
                if bounds.exceeds_projection() {
                    warn!(
                        "features reach beyond the projected latitudes, fitting {:?} clamped",
                        bounds
                    );
                }
                map.fit_bounds(
                    bounds,
                    &FitBoundsOptions::padding(FIT_PADDING.0, FIT_PADDING.1),
                )?
            }
            None => info!("no positioned features, keeping the current view"),
        }

        Ok(report)
    }
}
