use serde::{Deserialize, Serialize};

use std::f64::consts::PI;

pub const EARTH_RADIUS: f64 = 6_378_137.0;
/// Latitude at which the spherical mercator square ends.
pub const MAX_LATITUDE: f64 = 85.051_128_779_8;
pub const TILE_SIZE: f64 = 256.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> LatLng {
        LatLng { lat, lng }
    }

    /// Reads a GeoJSON position, which is ordered `[lng, lat, ...]`.
    pub fn from_position(position: &[f64]) -> Option<LatLng> {
        match position {
            [lng, lat, ..] if lng.is_finite() && lat.is_finite() => Some(LatLng::new(*lat, *lng)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(a: LatLng, b: LatLng) -> LatLngBounds {
        LatLngBounds {
            south_west: LatLng::new(a.lat.min(b.lat), a.lng.min(b.lng)),
            north_east: LatLng::new(a.lat.max(b.lat), a.lng.max(b.lng)),
        }
    }

    pub fn from_point(p: LatLng) -> LatLngBounds {
        LatLngBounds {
            south_west: p,
            north_east: p,
        }
    }

    pub fn extend(&mut self, p: LatLng) {
        self.south_west.lat = self.south_west.lat.min(p.lat);
        self.south_west.lng = self.south_west.lng.min(p.lng);
        self.north_east.lat = self.north_east.lat.max(p.lat);
        self.north_east.lng = self.north_east.lng.max(p.lng);
    }

    pub fn union(&mut self, other: &LatLngBounds) {
        self.extend(other.south_west);
        self.extend(other.north_east);
    }

    pub fn contains(&self, p: LatLng) -> bool {
        p.lat >= self.south_west.lat
            && p.lat <= self.north_east.lat
            && p.lng >= self.south_west.lng
            && p.lng <= self.north_east.lng
    }

    pub fn contains_bounds(&self, other: &LatLngBounds) -> bool {
        self.contains(other.south_west) && self.contains(other.north_east)
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    /// Whether part of the bounds lies beyond the latitudes the projection covers.
    pub fn exceeds_projection(&self) -> bool {
        self.north_east.lat > MAX_LATITUDE || self.south_west.lat < -MAX_LATITUDE
    }

    /// The bounds with both latitudes clamped to `±MAX_LATITUDE`.
    pub fn clamp_latitude(&self) -> LatLngBounds {
        let clamp = |p: LatLng| LatLng::new(p.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE), p.lng);
        LatLngBounds {
            south_west: clamp(self.south_west),
            north_east: clamp(self.north_east),
        }
    }

    pub fn north_west(&self) -> LatLng {
        LatLng::new(self.north_east.lat, self.south_west.lng)
    }

    pub fn south_east(&self) -> LatLng {
        LatLng::new(self.south_west.lat, self.north_east.lng)
    }
}

/// Pixel coordinates; `y` grows southwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

fn scale(zoom: f64) -> f64 {
    TILE_SIZE * 2_f64.powf(zoom)
}

/// Spherical mercator projection into the pixel space of `zoom`.
pub fn project(lat_lng: &LatLng, zoom: f64) -> Point {
    let d = PI / 180.0;
    let lat = lat_lng.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let sin = (lat * d).sin();

    let x = EARTH_RADIUS * lat_lng.lng * d;
    let y = EARTH_RADIUS * ((1.0 + sin) / (1.0 - sin)).ln() / 2.0;

    let k = 0.5 / (PI * EARTH_RADIUS);
    let s = scale(zoom);
    Point::new(s * (k * x + 0.5), s * (-k * y + 0.5))
}

pub fn unproject(point: &Point, zoom: f64) -> LatLng {
    let k = 0.5 / (PI * EARTH_RADIUS);
    let s = scale(zoom);
    let x = (point.x / s - 0.5) / k;
    let y = (point.y / s - 0.5) / -k;

    let d = 180.0 / PI;
    LatLng::new(
        (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0) * d,
        x * d / EARTH_RADIUS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_extend_bounds() {
        let mut bounds = LatLngBounds::from_point(LatLng::new(45.0, 9.0));
        bounds.extend(LatLng::new(44.0, 11.0));
        bounds.extend(LatLng::new(46.0, 10.0));

        assert_eq!(bounds.south_west, LatLng::new(44.0, 9.0));
        assert_eq!(bounds.north_east, LatLng::new(46.0, 11.0));
        assert!(bounds.contains(LatLng::new(45.5, 10.5)));
        assert!(!bounds.contains(LatLng::new(47.0, 10.5)));
    }

    #[test]
    fn test_new_normalizes_corners() {
        let bounds = LatLngBounds::new(LatLng::new(10.0, 20.0), LatLng::new(-10.0, -20.0));
        assert_eq!(bounds.south_west, LatLng::new(-10.0, -20.0));
        assert_eq!(bounds.center(), LatLng::new(0.0, 0.0));
    }

    #[test]
    fn test_clamp_latitude() {
        let polar = LatLngBounds::new(LatLng::new(88.0, 10.0), LatLng::new(-90.0, 12.0));
        assert!(polar.exceeds_projection());

        let clamped = polar.clamp_latitude();
        assert!(!clamped.exceeds_projection());
        assert_eq!(clamped.north_east, LatLng::new(MAX_LATITUDE, 12.0));
        assert_eq!(clamped.south_west, LatLng::new(-MAX_LATITUDE, 10.0));

        let milan = LatLngBounds::from_point(LatLng::new(45.46, 9.19));
        assert!(!milan.exceeds_projection());
        assert_eq!(milan.clamp_latitude(), milan);
    }

    #[test]
    fn test_position_order() {
        assert_eq!(
            LatLng::from_position(&[12.5, 41.9, 20.0]),
            Some(LatLng::new(41.9, 12.5))
        );
        assert_eq!(LatLng::from_position(&[12.5]), None);
        assert_eq!(LatLng::from_position(&[f64::NAN, 41.9]), None);
    }

    #[test]
    fn test_project_origin() {
        let p = project(&LatLng::new(0.0, 0.0), 0.0);
        assert!(close(p.x, 128.0));
        assert!(close(p.y, 128.0));

        let nw = project(&LatLng::new(MAX_LATITUDE, -180.0), 1.0);
        assert!(close(nw.x, 0.0));
        assert!(nw.y.abs() < 1e-6);
    }

    #[test]
    fn test_unproject_inverts_project() {
        let rome = LatLng::new(41.9028, 12.4964);
        let back = unproject(&project(&rome, 13.0), 13.0);
        assert!(close(back.lat, rome.lat));
        assert!(close(back.lng, rome.lng));
    }
}
