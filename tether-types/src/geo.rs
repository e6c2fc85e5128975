//! Geographic values and search constraints.

use serde::{Deserialize, Serialize};

/// A point on the globe, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoLocation {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A location constraint for searches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeoRange {
    /// Everything within `radius_meters` of `center`.
    Radius {
        center: GeoLocation,
        radius_meters: f64,
    },
    /// Everything inside the box spanned by two corners.
    BoundingBox {
        south_west: GeoLocation,
        north_east: GeoLocation,
    },
}

impl GeoRange {
    #[must_use]
    pub const fn within(center: GeoLocation, radius_meters: f64) -> Self {
        GeoRange::Radius {
            center,
            radius_meters,
        }
    }

    /// Encodes the range as a query parameter value.
    ///
    /// Radius: `lat,lng,radius`. Box: `swLat,swLng,neLat,neLng`.
    pub fn to_param(&self) -> String {
        match self {
            GeoRange::Radius {
                center,
                radius_meters,
            } => format!("{},{},{}", center.latitude, center.longitude, radius_meters),
            GeoRange::BoundingBox {
                south_west,
                north_east,
            } => format!(
                "{},{},{},{}",
                south_west.latitude, south_west.longitude, north_east.latitude, north_east.longitude
            ),
        }
    }
}
