// ── Map projection ──
//
// Flattens OLT and ONU coordinates onto a fixed canvas. Points are scaled
// linearly between the bounding box of everything shown; no geographic
// projection is attempted.

use oltnms_api::types::{Id, MapOlt, MapOnu};
use serde::Serialize;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PointKind {
    Olt,
    Onu,
}

/// A located device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub kind: PointKind,
    pub id: Id,
    pub label: String,
    pub status: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl MapPoint {
    fn from_olt(olt: &MapOlt) -> Option<Self> {
        Some(Self {
            kind: PointKind::Olt,
            id: olt.id,
            label: olt.name.clone(),
            status: olt.status.to_string(),
            latitude: olt.latitude?,
            longitude: olt.longitude?,
        })
    }

    fn from_onu(onu: &MapOnu) -> Option<Self> {
        Some(Self {
            kind: PointKind::Onu,
            id: onu.id,
            label: onu.name.clone(),
            status: onu.status.to_string(),
            latitude: onu.latitude?,
            longitude: onu.longitude?,
        })
    }
}

/// Gather every device that has both coordinates. ONUs are included only
/// when `onus` is given.
pub fn collect(olts: &[MapOlt], onus: Option<&[MapOnu]>) -> Vec<MapPoint> {
    let mut points: Vec<MapPoint> = olts.iter().filter_map(MapPoint::from_olt).collect();
    if let Some(onus) = onus {
        points.extend(onus.iter().filter_map(MapPoint::from_onu));
    }
    points
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Bounding box of `points`, or `None` when there are none.
    pub fn of(points: &[MapPoint]) -> Option<Self> {
        let first = points.first()?;
        let seed = Self {
            min_lat: first.latitude,
            max_lat: first.latitude,
            min_lng: first.longitude,
            max_lng: first.longitude,
        };
        Some(points.iter().skip(1).fold(seed, |b, p| Self {
            min_lat: b.min_lat.min(p.latitude),
            max_lat: b.max_lat.max(p.latitude),
            min_lng: b.min_lng.min(p.longitude),
            max_lng: b.max_lng.max(p.longitude),
        }))
    }

    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn lng_span(&self) -> f64 {
        self.max_lng - self.min_lng
    }
}

/// A point placed on the canvas. `(0, 0)` is the top-left corner, north up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projected {
    #[serde(flatten)]
    pub point: MapPoint,
    pub x: f64,
    pub y: f64,
}

/// Scale `points` onto a `width × height` canvas. An axis with zero span
/// (a single point, or points in a line) is centred on that axis.
pub fn project(points: &[MapPoint], width: f64, height: f64) -> Vec<Projected> {
    let Some(bounds) = Bounds::of(points) else {
        return Vec::new();
    };
    let lng_span = bounds.lng_span();
    let lat_span = bounds.lat_span();

    points
        .iter()
        .map(|p| {
            let x = if lng_span > 0.0 {
                (p.longitude - bounds.min_lng) / lng_span * width
            } else {
                width / 2.0
            };
            let y = if lat_span > 0.0 {
                (bounds.max_lat - p.latitude) / lat_span * height
            } else {
                height / 2.0
            };
            Projected {
                point: p.clone(),
                x,
                y,
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use serde_json::json;

    use super::*;

    fn map_olt(id: i64, lat: Option<f64>, lng: Option<f64>) -> MapOlt {
        serde_json::from_value(json!({
            "id": id, "name": format!("OLT-{id}"), "status": "online",
            "latitude": lat, "longitude": lng
        }))
        .unwrap()
    }

    #[test]
    fn collect_skips_unlocated_devices() {
        let olts = vec![map_olt(1, Some(-6.2), Some(106.8)), map_olt(2, None, Some(107.0))];
        let onus: Vec<MapOnu> = vec![
            serde_json::from_value(json!({
                "id": 9, "name": "Cust 9", "serial_number": "ZTEG9", "status": "online",
                "latitude": -6.3, "longitude": 106.9
            }))
            .unwrap(),
        ];

        assert_eq!(collect(&olts, None).len(), 1);
        let all = collect(&olts, Some(&onus));
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].kind, PointKind::Onu);
    }

    #[test]
    fn empty_input_has_no_bounds() {
        assert!(Bounds::of(&[]).is_none());
        assert!(project(&[], 800.0, 600.0).is_empty());
    }

    #[test]
    fn corners_map_to_canvas_edges() {
        let points = collect(
            &[
                map_olt(1, Some(-6.0), Some(106.0)),
                map_olt(2, Some(-7.0), Some(108.0)),
                map_olt(3, Some(-6.5), Some(107.0)),
            ],
            None,
        );
        let projected = project(&points, 800.0, 600.0);

        // north-west corner
        assert_eq!((projected[0].x, projected[0].y), (0.0, 0.0));
        // south-east corner
        assert_eq!((projected[1].x, projected[1].y), (800.0, 600.0));
        assert_eq!((projected[2].x, projected[2].y), (400.0, 300.0));
    }

    #[test]
    fn single_point_is_centred() {
        let points = collect(&[map_olt(1, Some(-6.2), Some(106.8))], None);
        let projected = project(&points, 800.0, 600.0);
        assert_eq!((projected[0].x, projected[0].y), (400.0, 300.0));
    }

    #[test]
    fn zero_span_axis_is_centred_independently() {
        let points = collect(
            &[map_olt(1, Some(-6.0), Some(106.0)), map_olt(2, Some(-6.0), Some(108.0))],
            None,
        );
        let projected = project(&points, 800.0, 600.0);
        assert_eq!(projected[0].x, 0.0);
        assert_eq!(projected[1].x, 800.0);
        assert!(projected.iter().all(|p| p.y == 300.0));
    }
}
