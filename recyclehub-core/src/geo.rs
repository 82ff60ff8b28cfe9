//! Great-circle distances and nearest recycle-point lookup.

use std::cmp::Ordering;

use crate::model::{GeoPoint, NearestPoint, RecyclePoint};

/// Mean Earth radius used for all distance computations.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points in kilometers.
///
/// Coordinates are not validated; out-of-range input still yields a number.
/// Only NaN coordinates produce a NaN distance.
#[must_use]
pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat_from = from.latitude.to_radians();
    let lat_to = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let half_chord = (delta_lat / 2.0).sin().powi(2)
        + lat_from.cos() * lat_to.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push antipodal pairs just past 1.
    let half_chord = half_chord.clamp(0.0, 1.0);
    let angle = 2.0 * half_chord.sqrt().atan2((1.0 - half_chord).sqrt());

    EARTH_RADIUS_KM * angle
}

/// Linear-scan search over candidate recycle points.
pub struct NearestPointFinder;

impl NearestPointFinder {
    /// Return the point closest to `user`, or `None` for an empty slice.
    ///
    /// Ties go to the point that appears first in `points`. A NaN distance only
    /// wins when every candidate is NaN.
    #[must_use]
    pub fn find(user: GeoPoint, points: &[RecyclePoint]) -> Option<NearestPoint> {
        let mut best: Option<(&RecyclePoint, f64)> = None;

        for point in points {
            let distance = haversine_km(user, point.location);
            let closer = match best {
                None => true,
                Some((_, best_distance)) if best_distance.is_nan() => !distance.is_nan(),
                Some((_, best_distance)) => distance < best_distance,
            };
            if closer {
                best = Some((point, distance));
            }
        }

        best.map(|(point, distance_km)| NearestPoint {
            point: point.clone(),
            distance_km,
        })
    }

    /// Annotate every point with its distance and order them nearest first.
    ///
    /// The sort is stable, so equal distances keep input order, and NaN distances
    /// go last. The first entry always matches [`NearestPointFinder::find`].
    #[must_use]
    pub fn rank(user: GeoPoint, points: &[RecyclePoint]) -> Vec<NearestPoint> {
        let mut ranked: Vec<NearestPoint> = points
            .iter()
            .map(|point| NearestPoint {
                point: point.clone(),
                distance_km: haversine_km(user, point.location),
            })
            .collect();
        ranked.sort_by(|left, right| {
            match (left.distance_km.is_nan(), right.distance_km.is_nan()) {
                (false, false) => left
                    .distance_km
                    .partial_cmp(&right.distance_km)
                    .unwrap_or(Ordering::Equal),
                (left_nan, right_nan) => left_nan.cmp(&right_nan),
            }
        });
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PointId;

    const TOLERANCE_KM: f64 = 1e-6;

    fn point(id: &str, latitude: f64, longitude: f64) -> RecyclePoint {
        RecyclePoint {
            id: PointId(id.to_owned()),
            name: format!("Point {id}"),
            location: GeoPoint::new(latitude, longitude),
        }
    }

    #[test]
    fn one_degree_of_longitude_on_equator() {
        let distance = haversine_km(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0));
        assert!((distance - 111.19).abs() < 0.1, "got {distance}");
    }

    #[test]
    fn distance_to_self_is_zero() {
        let here = GeoPoint::new(12.9716, 77.5946);
        assert!(haversine_km(here, here).abs() < TOLERANCE_KM);
    }

    #[test]
    fn empty_candidates_yield_none() {
        assert!(NearestPointFinder::find(GeoPoint::new(0.0, 0.0), &[]).is_none());
    }

    #[test]
    fn single_candidate_matches_hand_computed_distance() {
        let user = GeoPoint::new(52.52, 13.405);
        let only = point("paris", 48.8566, 2.3522);

        let nearest = NearestPointFinder::find(user, std::slice::from_ref(&only));

        let lat_user = 52.52_f64.to_radians();
        let lat_only = 48.8566_f64.to_radians();
        let delta_lat = (48.8566_f64 - 52.52).to_radians();
        let delta_lon = (2.3522_f64 - 13.405).to_radians();
        let hav = (delta_lat / 2.0).sin() * (delta_lat / 2.0).sin()
            + lat_user.cos() * lat_only.cos() * (delta_lon / 2.0).sin() * (delta_lon / 2.0).sin();
        let expected = 6371.0 * 2.0 * hav.sqrt().atan2((1.0 - hav).sqrt());

        let found = nearest.expect("one candidate must match");
        assert_eq!(found.point, only);
        assert!((found.distance_km - expected).abs() < TOLERANCE_KM);
    }

    #[test]
    fn picks_the_closest_of_three() {
        // One degree of latitude is ~111.19 km, so offsets are scaled to km.
        let km = 1.0 / 111.194_926_644_558_73;
        let user = GeoPoint::new(0.0, 0.0);
        let points = [
            point("five", 5.0 * km, 0.0),
            point("two", -2.0 * km, 0.0),
            point("eight", 8.0 * km, 0.0),
        ];

        let found = NearestPointFinder::find(user, &points).expect("non-empty");

        assert_eq!(found.point.id, PointId("two".to_owned()));
        assert!((found.distance_km - 2.0).abs() < 1e-3);
    }

    #[test]
    fn equal_distances_keep_first_candidate() {
        let user = GeoPoint::new(0.0, 0.0);
        let points = [point("east", 0.0, 0.5), point("west", 0.0, -0.5)];

        let found = NearestPointFinder::find(user, &points).expect("non-empty");

        assert_eq!(found.point.id, PointId("east".to_owned()));
    }

    #[test]
    fn rank_orders_by_distance_and_keeps_ties_stable() {
        let user = GeoPoint::new(0.0, 0.0);
        let points = [
            point("far", 0.0, 3.0),
            point("east", 0.0, 1.0),
            point("west", 0.0, -1.0),
        ];

        let ranked = NearestPointFinder::rank(user, &points);
        let ids: Vec<&str> = ranked.iter().map(|entry| entry.point.id.0.as_str()).collect();

        assert_eq!(ids, vec!["east", "west", "far"]);
    }

    #[test]
    fn antipodes_are_half_the_circumference() {
        let user = GeoPoint::new(-87.843, 0.0);
        let distance = haversine_km(user, GeoPoint::new(87.843, -180.0));

        assert!(distance.is_finite());
        assert!((distance - EARTH_RADIUS_KM * std::f64::consts::PI).abs() < 1e-3);
    }

    #[test]
    fn out_of_range_coordinates_still_give_a_distance() {
        let distance = haversine_km(GeoPoint::new(135.0, 400.0), GeoPoint::new(-95.0, -270.0));

        assert!(distance.is_finite());
        assert!((0.0..=EARTH_RADIUS_KM * std::f64::consts::PI + 1e-6).contains(&distance));
    }

    #[test]
    fn antipode_never_beats_a_colocated_point() {
        let user = GeoPoint::new(-87.843, 0.0);
        let points = [point("anti", 87.843, -180.0), point("near", -87.843, 0.0)];

        let found = NearestPointFinder::find(user, &points).expect("non-empty");
        let ranked = NearestPointFinder::rank(user, &points);

        assert_eq!(found.point.id, PointId("near".to_owned()));
        assert!(found.distance_km.abs() < TOLERANCE_KM);
        assert!(ranked.iter().all(|entry| entry.distance_km.is_finite()));
        assert_eq!(ranked.first().map(|entry| &entry.point.id), Some(&found.point.id));
    }

    #[test]
    fn nan_distance_loses_to_any_real_distance() {
        let user = GeoPoint::new(0.0, 0.0);
        let points = [
            point("broken", f64::NAN, 0.0),
            point("far", 0.0, 90.0),
            point("negative-nan", -f64::NAN, 0.0),
            point("close", 0.0, 1.0),
        ];

        let found = NearestPointFinder::find(user, &points).expect("non-empty");
        let ranked = NearestPointFinder::rank(user, &points);
        let ids: Vec<&str> = ranked.iter().map(|entry| entry.point.id.0.as_str()).collect();

        assert_eq!(found.point.id, PointId("close".to_owned()));
        assert_eq!(ids, vec!["close", "far", "broken", "negative-nan"]);
    }

    #[test]
    fn all_nan_candidates_fall_back_to_the_first() {
        let user = GeoPoint::new(f64::NAN, 0.0);
        let points = [point("first", 1.0, 1.0), point("second", 2.0, 2.0)];

        let found = NearestPointFinder::find(user, &points).expect("non-empty");
        let ranked = NearestPointFinder::rank(user, &points);

        assert_eq!(found.point.id, PointId("first".to_owned()));
        assert!(found.distance_km.is_nan());
        assert_eq!(ranked.first().map(|entry| &entry.point.id), Some(&found.point.id));
    }

    #[test]
    fn rank_and_find_agree_on_the_winner() {
        let user = GeoPoint::new(51.5, -0.12);
        let points = [
            point("a", 51.6, -0.1),
            point("b", 51.45, -0.2),
            point("c", 51.6, -0.1),
            point("d", 40.0, 170.0),
        ];

        let found = NearestPointFinder::find(user, &points).expect("non-empty");
        let ranked = NearestPointFinder::rank(user, &points);

        assert_eq!(ranked.first().map(|entry| &entry.point.id), Some(&found.point.id));
    }
}
