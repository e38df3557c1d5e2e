pub mod viewport;

use crate::geo::{LatLng, LatLngBounds, Point};
use crate::layers::{LayerGroup, TileLayer};
use crate::MapResult;

pub use viewport::Viewport;

use log::debug;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LayerId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitBoundsOptions {
    /// Pixels kept free on the (left/right, top/bottom) sides.
    pub padding: (f64, f64),
}

impl FitBoundsOptions {
    pub fn padding(x: f64, y: f64) -> FitBoundsOptions {
        FitBoundsOptions { padding: (x, y) }
    }
}

impl Default for FitBoundsOptions {
    fn default() -> Self {
        FitBoundsOptions::padding(0.0, 0.0)
    }
}

/// The operations the initializer needs from a map widget.
pub trait MapWidget {
    fn add_tile_layer(&mut self, layer: TileLayer) -> LayerId;
    fn add_layer_group(&mut self, group: LayerGroup) -> LayerId;
    fn layer_group_mut(&mut self, id: LayerId) -> Option<&mut LayerGroup>;
    fn fit_bounds(&mut self, bounds: &LatLngBounds, options: &FitBoundsOptions) -> MapResult<()>;
}

#[derive(Debug, Clone)]
pub enum Layer {
    Tile(TileLayer),
    Group(LayerGroup),
}

/// In-memory map widget: a layer stack and a viewport, no drawing.
#[derive(Debug, Clone)]
pub struct HeadlessMap {
    layers: Vec<Layer>,
    viewport: Viewport,
}

impl HeadlessMap {
    pub fn new(width: f64, height: f64) -> HeadlessMap {
        HeadlessMap::with_viewport(Viewport::new(
            LatLng::new(0.0, 0.0),
            0.0,
            Point::new(width, height),
        ))
    }

    pub fn with_viewport(viewport: Viewport) -> HeadlessMap {
        HeadlessMap {
            layers: Vec::new(),
            viewport,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(id.0)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn tile_layers(&self) -> impl Iterator<Item = &TileLayer> {
        self.layers.iter().filter_map(|l| match l {
            Layer::Tile(t) => Some(t),
            Layer::Group(_) => None,
        })
    }

    pub fn layer_groups(&self) -> impl Iterator<Item = &LayerGroup> {
        self.layers.iter().filter_map(|l| match l {
            Layer::Group(g) => Some(g),
            Layer::Tile(_) => None,
        })
    }

    fn push(&mut self, layer: Layer) -> LayerId {
        self.layers.push(layer);
        LayerId(self.layers.len() - 1)
    }
}

impl MapWidget for HeadlessMap {
    fn add_tile_layer(&mut self, layer: TileLayer) -> LayerId {
        // the map may zoom in as far as its most detailed tile layer allows
        let max_zoom = self
            .tile_layers()
            .map(TileLayer::max_zoom)
            .fold(layer.max_zoom(), u8::max);
        self.viewport.max_zoom = f64::from(max_zoom);

        debug!("adding tile layer {}", layer.url_template());
        self.push(Layer::Tile(layer))
    }

    fn add_layer_group(&mut self, group: LayerGroup) -> LayerId {
        self.push(Layer::Group(group))
    }

    fn layer_group_mut(&mut self, id: LayerId) -> Option<&mut LayerGroup> {
        match self.layers.get_mut(id.0) {
            Some(Layer::Group(g)) => Some(g),
            _ => None,
        }
    }

    fn fit_bounds(&mut self, bounds: &LatLngBounds, options: &FitBoundsOptions) -> MapResult<()> {
        let max_zoom = self.viewport.max_zoom;
        self.viewport.fit_bounds(bounds, options.padding, max_zoom)?;
        debug!(
            "fitted view to {:?}: center {:?}, zoom {}",
            bounds, self.viewport.center, self.viewport.zoom
        );
        Ok(())
    }
}
