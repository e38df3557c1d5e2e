use crate::geo::{project, unproject, LatLng, LatLngBounds, Point};
use crate::{MapError, MapResult};

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: f64,
    /// Size in pixels.
    pub size: Point,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Viewport {
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Viewport {
        Viewport {
            center,
            zoom: zoom.clamp(0.0, 18.0),
            size,
            min_zoom: 0.0,
            max_zoom: 18.0,
        }
    }

    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.center = center;
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Region visible with the current center and zoom.
    pub fn bounds(&self) -> LatLngBounds {
        self.inner_bounds((0.0, 0.0))
    }

    /// Region visible once `padding` pixels are cut off each side.
    pub fn inner_bounds(&self, padding: (f64, f64)) -> LatLngBounds {
        let c = project(&self.center, self.zoom);
        let half_x = self.size.x / 2.0 - padding.0;
        let half_y = self.size.y / 2.0 - padding.1;

        let nw = unproject(&Point::new(c.x - half_x, c.y - half_y), self.zoom);
        let se = unproject(&Point::new(c.x + half_x, c.y + half_y), self.zoom);
        LatLngBounds::new(nw, se)
    }

    /// Largest integral zoom, capped at `max_zoom`, at which `bounds` fits
    /// into the viewport minus `padding` on every side. Latitudes beyond
    /// `MAX_LATITUDE` are fitted as if clamped to it.
    pub fn bounds_zoom(
        &self,
        bounds: &LatLngBounds,
        padding: (f64, f64),
        max_zoom: f64,
    ) -> MapResult<f64> {
        let bounds = bounds.clamp_latitude();
        let available = Point::new(
            self.size.x - 2.0 * padding.0,
            self.size.y - 2.0 * padding.1,
        );
        if available.x <= 0.0 || available.y <= 0.0 {
            return Err(MapError::ViewportTooSmall {
                width: self.size.x,
                height: self.size.y,
                padding,
            });
        }

        let min_zoom = self.min_zoom.ceil() as i32;
        let max_zoom = max_zoom.min(self.max_zoom).floor() as i32;

        for zoom in (min_zoom..=max_zoom).rev() {
            let zoom = f64::from(zoom);
            let nw = project(&bounds.north_west(), zoom);
            let se = project(&bounds.south_east(), zoom);

            if (se.x - nw.x).abs() <= available.x && (se.y - nw.y).abs() <= available.y {
                return Ok(zoom);
            }
        }
        Ok(self.min_zoom)
    }

    pub fn fit_bounds(
        &mut self,
        bounds: &LatLngBounds,
        padding: (f64, f64),
        max_zoom: f64,
    ) -> MapResult<()> {
        let zoom = self.bounds_zoom(bounds, padding, max_zoom)?;

        let bounds = bounds.clamp_latitude();
        let nw = project(&bounds.north_west(), zoom);
        let se = project(&bounds.south_east(), zoom);
        let center = unproject(&nw.midpoint(&se), zoom);

        self.set_view(center, zoom);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(LatLng::new(0.0, 0.0), 2.0, Point::new(800.0, 600.0))
    }

    #[test]
    fn test_fit_two_cities() {
        let mut vp = viewport();
        vp.max_zoom = 19.0;
        let milan_turin =
            LatLngBounds::new(LatLng::new(45.4642, 9.19), LatLng::new(45.0703, 7.6869));

        vp.fit_bounds(&milan_turin, (30.0, 30.0), 19.0).unwrap();

        // 1.5 degrees of longitude span 547 pixels at zoom 9, 1094 at zoom 10
        assert_eq!(vp.zoom, 9.0);
        assert!(vp.inner_bounds((30.0, 30.0)).contains_bounds(&milan_turin));
    }

    #[test]
    fn test_single_point_uses_max_zoom() {
        let mut vp = viewport();
        vp.max_zoom = 19.0;
        let point = LatLngBounds::from_point(LatLng::new(45.4642, 9.19));

        vp.fit_bounds(&point, (30.0, 30.0), 19.0).unwrap();

        assert_eq!(vp.zoom, 19.0);
        assert!((vp.center.lat - 45.4642).abs() < 1e-9);
        assert!((vp.center.lng - 9.19).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_capped_by_viewport_limit() {
        let vp = viewport();
        let point = LatLngBounds::from_point(LatLng::new(10.0, 10.0));
        assert_eq!(vp.bounds_zoom(&point, (30.0, 30.0), 19.0).unwrap(), 18.0);
    }

    #[test]
    fn test_whole_world_falls_back_to_min_zoom() {
        let vp = Viewport::new(LatLng::new(0.0, 0.0), 2.0, Point::new(100.0, 100.0));
        let world = LatLngBounds::new(LatLng::new(-85.0, -180.0), LatLng::new(85.0, 180.0));
        assert_eq!(vp.bounds_zoom(&world, (30.0, 30.0), 19.0).unwrap(), 0.0);
    }

    #[test]
    fn test_polar_point_is_fitted_at_projection_edge() {
        let mut vp = viewport();
        let bounds = LatLngBounds::new(LatLng::new(88.0, 10.0), LatLng::new(45.0, 12.0));

        vp.fit_bounds(&bounds, (30.0, 30.0), 19.0).unwrap();

        // the clamped span is 368 pixels tall at zoom 2 and 737 at zoom 3
        assert_eq!(vp.zoom, 2.0);
        let inner = vp.inner_bounds((30.0, 30.0));
        assert!(inner.contains_bounds(&bounds.clamp_latitude()));
        assert!(!inner.contains(LatLng::new(88.0, 10.0)));
    }

    #[test]
    fn test_padding_larger_than_viewport() {
        let vp = Viewport::new(LatLng::new(0.0, 0.0), 2.0, Point::new(50.0, 600.0));
        let point = LatLngBounds::from_point(LatLng::new(10.0, 10.0));
        match vp.bounds_zoom(&point, (30.0, 30.0), 19.0) {
            Err(MapError::ViewportTooSmall { width, .. }) => assert_eq!(width, 50.0),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_bounds_contain_center() {
        let vp = Viewport::new(LatLng::new(41.9, 12.5), 10.0, Point::new(640.0, 480.0));
        let bounds = vp.bounds();
        assert!(bounds.contains(vp.center));
        assert!(bounds.contains_bounds(&vp.inner_bounds((30.0, 30.0))));
    }
}
