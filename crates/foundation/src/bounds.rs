/// A geographic position in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }
}

/// Axis-aligned geographic rectangle, inclusive on every edge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LatLngBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        LatLngBounds {
            south: south_west.lat,
            west: south_west.lng,
            north: north_east.lat,
            east: north_east.lng,
        }
    }

    /// Degenerate bounds covering a single position.
    pub fn from_point(p: LatLng) -> Self {
        Self::new(p, p)
    }

    /// Smallest bounds containing every position, or `None` for an empty input.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LatLng>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut out = Self::from_point(first);
        for p in iter {
            out.extend(p);
        }
        Some(out)
    }

    pub fn extend(&mut self, p: LatLng) {
        self.south = self.south.min(p.lat);
        self.north = self.north.max(p.lat);
        self.west = self.west.min(p.lng);
        self.east = self.east.max(p.lng);
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut out = *self;
        out.extend(other.south_west());
        out.extend(other.north_east());
        out
    }

    pub fn south_west(&self) -> LatLng {
        LatLng::new(self.south, self.west)
    }

    pub fn north_east(&self) -> LatLng {
        LatLng::new(self.north, self.east)
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    pub fn contains(&self, p: LatLng) -> bool {
        p.lat >= self.south && p.lat <= self.north && p.lng >= self.west && p.lng <= self.east
    }

    /// Serializes as `west,south,east,north`, the ordering web mapping
    /// libraries use for bbox query strings.
    pub fn to_bbox_string(&self) -> String {
        format!("{},{},{},{}", self.west, self.south, self.east, self.north)
    }
}

#[cfg(test)]
mod tests {
    use super::{LatLng, LatLngBounds};

    #[test]
    fn bbox_string_is_west_south_east_north() {
        let b = LatLngBounds::new(LatLng::new(44.5, -1.25), LatLng::new(45.0, -0.5));
        assert_eq!(b.to_bbox_string(), "-1.25,44.5,-0.5,45");
    }

    #[test]
    fn from_points_covers_all_inputs() {
        let b = LatLngBounds::from_points([
            LatLng::new(1.0, 2.0),
            LatLng::new(-3.0, 5.0),
            LatLng::new(0.5, -7.0),
        ])
        .expect("bounds");
        assert_eq!(b.south, -3.0);
        assert_eq!(b.north, 1.0);
        assert_eq!(b.west, -7.0);
        assert_eq!(b.east, 5.0);
        assert!(b.contains(LatLng::new(0.0, 0.0)));
    }

    #[test]
    fn from_points_empty_is_none() {
        assert!(LatLngBounds::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn union_and_center() {
        let a = LatLngBounds::from_point(LatLng::new(0.0, 0.0));
        let b = LatLngBounds::from_point(LatLng::new(10.0, 20.0));
        let u = a.union(&b);
        assert_eq!(u.center(), LatLng::new(5.0, 10.0));
    }
}
