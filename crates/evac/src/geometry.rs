use foundation::LatLon;
use routing::MultiPolygon;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockageKind {
    Polygon,
    Rectangle,
}

/// A user-drawn obstacle excluded from routing.
///
/// The ring is always closed: first point equals last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blockage {
    pub kind: BlockageKind,
    ring: Vec<LatLon>,
}

impl Blockage {
    pub fn new(kind: BlockageKind, points: &[LatLon]) -> Self {
        Self {
            kind,
            ring: to_closed_ring(points),
        }
    }

    pub fn polygon(points: &[LatLon]) -> Self {
        Self::new(BlockageKind::Polygon, points)
    }

    /// Axis-aligned rectangle spanned by two opposite corners.
    ///
    /// Corner order is south-west, north-west, north-east, south-east.
    pub fn rectangle(a: LatLon, b: LatLon) -> Self {
        let south = a.lat.min(b.lat);
        let north = a.lat.max(b.lat);
        let west = a.lon.min(b.lon);
        let east = a.lon.max(b.lon);
        Self::new(
            BlockageKind::Rectangle,
            &[
                LatLon::new(south, west),
                LatLon::new(north, west),
                LatLon::new(north, east),
                LatLon::new(south, east),
            ],
        )
    }

    pub fn ring(&self) -> &[LatLon] {
        &self.ring
    }

    /// First vertex; used as the anchor of derived overlays.
    pub fn anchor(&self) -> Option<LatLon> {
        self.ring.first().copied()
    }

    pub fn contains(&self, p: LatLon) -> bool {
        point_in_ring(p, &self.ring)
    }
}

/// Returns `points` with the first point appended when the ring is open.
pub fn to_closed_ring(points: &[LatLon]) -> Vec<LatLon> {
    let mut ring = points.to_vec();
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        if first != last {
            ring.push(*first);
        }
    }
    ring
}

/// One single-ring polygon per blockage, in `[lon, lat]` order.
///
/// `None` when there are no blockages, so the request omits the field.
pub fn build_avoidance_set(blockages: &[Blockage]) -> Option<MultiPolygon> {
    if blockages.is_empty() {
        return None;
    }
    let coordinates = blockages
        .iter()
        .map(|b| vec![b.ring.iter().map(|p| p.to_lon_lat()).collect()])
        .collect();
    Some(MultiPolygon { coordinates })
}

/// Even-odd test in plain degree space.
pub fn point_in_ring(p: LatLon, ring: &[LatLon]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (xi, yi) = (ring[i].lat, ring[i].lon);
        let (xj, yj) = (ring[j].lat, ring[j].lon);
        if (yi > p.lon) != (yj > p.lon) && p.lat < (xj - xi) * (p.lon - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tri() -> Vec<LatLon> {
        vec![
            LatLon::new(0.0, 0.0),
            LatLon::new(1.0, 0.0),
            LatLon::new(0.0, 1.0),
        ]
    }

    #[test]
    fn open_ring_gets_closed() {
        let ring = to_closed_ring(&tri());
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn closed_ring_is_unchanged() {
        let mut closed = tri();
        closed.push(closed[0]);
        assert_eq!(to_closed_ring(&closed), closed);
    }

    #[test]
    fn single_point_is_already_closed() {
        let p = [LatLon::new(5.0, 6.0)];
        assert_eq!(to_closed_ring(&p), p.to_vec());
        assert!(to_closed_ring(&[]).is_empty());
    }

    #[test]
    fn input_is_not_mutated() {
        let open = tri();
        let _ = to_closed_ring(&open);
        assert_eq!(open.len(), 3);
    }

    #[test]
    fn no_blockages_means_absent_set() {
        assert_eq!(build_avoidance_set(&[]), None);
    }

    #[test]
    fn one_polygon_per_blockage_with_swapped_axes() {
        let a = Blockage::polygon(&tri());
        let b = Blockage::rectangle(LatLon::new(10.0, 20.0), LatLon::new(11.0, 21.0));
        let set = build_avoidance_set(&[a.clone(), b.clone()]).expect("set");
        assert_eq!(set.polygon_count(), 2);

        for (polygon, blockage) in set.coordinates.iter().zip([&a, &b]) {
            assert_eq!(polygon.len(), 1);
            let expected: Vec<[f64; 2]> = blockage.ring().iter().map(|p| [p.lon, p.lat]).collect();
            assert_eq!(polygon[0], expected);
        }
    }

    #[test]
    fn rectangle_ring_is_closed_and_ordered() {
        let r = Blockage::rectangle(LatLon::new(11.0, 21.0), LatLon::new(10.0, 20.0));
        assert_eq!(r.kind, BlockageKind::Rectangle);
        assert_eq!(
            r.ring(),
            &[
                LatLon::new(10.0, 20.0),
                LatLon::new(11.0, 20.0),
                LatLon::new(11.0, 21.0),
                LatLon::new(10.0, 21.0),
                LatLon::new(10.0, 20.0),
            ]
        );
    }

    #[test]
    fn containment() {
        let r = Blockage::rectangle(LatLon::new(0.0, 0.0), LatLon::new(2.0, 2.0));
        assert!(r.contains(LatLon::new(1.0, 1.0)));
        assert!(!r.contains(LatLon::new(3.0, 1.0)));
        assert!(!r.contains(LatLon::new(1.0, -0.5)));
        assert!(!Blockage::polygon(&[LatLon::new(1.0, 1.0)]).contains(LatLon::new(1.0, 1.0)));
    }
}
