use crate::features::{feature_bounds, union_bounds};
use crate::geo::LatLngBounds;

use geojson::Feature;
use serde::Serialize;

pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_MAX_ZOOM: u8 = 19;

#[derive(Debug, Clone, Serialize)]
pub struct TileLayerOptions {
    pub max_zoom: u8,
    pub subdomains: Vec<String>,
}

impl Default for TileLayerOptions {
    fn default() -> Self {
        TileLayerOptions {
            max_zoom: 18,
            subdomains: vec!["a".to_owned(), "b".to_owned(), "c".to_owned()],
        }
    }
}

/// Raster background addressed by a `{s}`/`{z}`/`{x}`/`{y}` url template.
#[derive(Debug, Clone, Serialize)]
pub struct TileLayer {
    url_template: String,
    options: TileLayerOptions,
}

impl TileLayer {
    pub fn new(url_template: &str, options: TileLayerOptions) -> TileLayer {
        TileLayer {
            url_template: url_template.to_owned(),
            options,
        }
    }

    pub fn openstreetmap() -> TileLayer {
        TileLayer::new(
            OSM_TILE_URL,
            TileLayerOptions {
                max_zoom: OSM_MAX_ZOOM,
                ..TileLayerOptions::default()
            },
        )
    }

    pub fn url_template(&self) -> &str {
        &self.url_template
    }

    pub fn max_zoom(&self) -> u8 {
        self.options.max_zoom
    }

    pub fn tile_url(&self, z: u8, x: u32, y: u32) -> String {
        let subdomains = &self.options.subdomains;
        let s = if subdomains.is_empty() {
            ""
        } else {
            let index = (u64::from(x) + u64::from(y)) % subdomains.len() as u64;
            subdomains[index as usize].as_str()
        };

        self.url_template
            .replace("{s}", s)
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupOptions {
    pub min_width: u32,
    pub max_width: u32,
}

impl Default for PopupOptions {
    fn default() -> Self {
        PopupOptions {
            min_width: 50,
            max_width: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub content: String,
    pub options: PopupOptions,
}

#[derive(Debug, Clone)]
pub struct RenderedFeature {
    feature: Feature,
    bounds: Option<LatLngBounds>,
    popup: Option<Popup>,
}

impl RenderedFeature {
    pub fn new(feature: Feature) -> RenderedFeature {
        let bounds = feature_bounds(&feature);
        RenderedFeature {
            feature,
            bounds,
            popup: None,
        }
    }

    pub fn bind_popup(&mut self, content: String, options: PopupOptions) {
        self.popup = Some(Popup { content, options });
    }

    pub fn feature(&self) -> &Feature {
        &self.feature
    }

    /// `None` for features without a positioned geometry.
    pub fn bounds(&self) -> Option<LatLngBounds> {
        self.bounds
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }
}

#[derive(Debug, Clone, Default)]
pub struct LayerGroup {
    entries: Vec<RenderedFeature>,
}

impl LayerGroup {
    pub fn new() -> LayerGroup {
        LayerGroup::default()
    }

    pub fn add(&mut self, feature: RenderedFeature) {
        self.entries.push(feature);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RenderedFeature> {
        self.entries.iter()
    }

    pub fn bounds(&self) -> Option<LatLngBounds> {
        union_bounds(self.entries.iter().filter_map(RenderedFeature::bounds))
    }
}
