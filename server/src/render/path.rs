use std::fmt::Write as _;

use choropleth_shared::Geometry;

/// SVG path data for a pre-projected geometry: one `M…L…Z` subpath per ring.
///
/// Rings arrive closed (first point repeated at the end); the repeat is
/// dropped since `Z` already closes the subpath.
pub fn path_data(geometry: &Geometry) -> String {
    let mut d = String::new();
    for ring in geometry.rings() {
        let points = match ring.as_slice() {
            [first, rest @ .., last] if first == last => &ring[..rest.len() + 1],
            _ => ring.as_slice(),
        };
        let Some((first, rest)) = points.split_first() else {
            continue;
        };
        let _ = write!(d, "M{},{}", coord(first[0]), coord(first[1]));
        for point in rest {
            let _ = write!(d, "L{},{}", coord(point[0]), coord(point[1]));
        }
        d.push('Z');
    }
    d
}

/// Shortest decimal form rounded to three places; never `-0`.
pub(crate) fn coord(value: f64) -> f64 {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}

#[cfg(test)]
mod tests {
    use choropleth_shared::Geometry;

    use super::{coord, path_data};

    #[test]
    fn closed_ring_becomes_single_subpath() {
        let geometry = Geometry::Polygon(vec![vec![
            [0.0, 0.0],
            [10.0, 0.0],
            [10.0, 5.5],
            [0.0, 0.0],
        ]]);
        assert_eq!(path_data(&geometry), "M0,0L10,0L10,5.5Z");
    }

    #[test]
    fn multipolygon_and_holes_emit_one_subpath_per_ring() {
        let square = |o: f64| vec![[o, o], [o + 1.0, o], [o + 1.0, o + 1.0], [o, o]];
        let geometry = Geometry::MultiPolygon(vec![vec![square(0.0), square(0.25)], vec![square(5.0)]]);
        assert_eq!(
            path_data(&geometry),
            "M0,0L1,0L1,1ZM0.25,0.25L1.25,0.25L1.25,1.25ZM5,5L6,5L6,6Z"
        );
    }

    #[test]
    fn empty_geometry_has_empty_path() {
        assert_eq!(path_data(&Geometry::Empty), "");
        assert_eq!(path_data(&Geometry::Polygon(vec![vec![]])), "");
    }

    #[test]
    fn coordinates_are_rounded_and_never_negative_zero() {
        assert_eq!(coord(1.23456).to_string(), "1.235");
        assert_eq!(coord(-0.0001).to_string(), "0");
        assert_eq!(coord(-2.5).to_string(), "-2.5");
    }
}
