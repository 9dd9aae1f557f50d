use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Key shared by the boundary and statistics datasets (a county FIPS code).
///
/// Sources disagree on whether the code is a JSON number or a string, so both
/// are accepted and normalized to the decimal string form. `1001` and
/// `"1001"` are the same id; `"01001"` is not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(String);

impl RegionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for RegionId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for RegionId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl Serialize for RegionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RegionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RegionIdVisitor;

        impl Visitor<'_> for RegionIdVisitor {
            type Value = RegionId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integer or string region id")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<RegionId, E> {
                Ok(RegionId::from(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<RegionId, E> {
                Ok(RegionId(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<RegionId, E> {
                if v.is_finite() && v.fract() == 0.0 {
                    Ok(RegionId(format!("{v:.0}")))
                } else {
                    Err(E::invalid_value(de::Unexpected::Float(v), &self))
                }
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<RegionId, E> {
                Ok(RegionId(v.trim().to_owned()))
            }
        }

        deserializer.deserialize_any(RegionIdVisitor)
    }
}

/// A closed ring of `[x, y]` points in screen space.
pub type Ring = Vec<[f64; 2]>;

/// Boundary geometry. The join never inspects it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Geometry {
    #[default]
    Empty,
    /// Exterior ring followed by any holes.
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

impl Geometry {
    /// Iterate every ring regardless of polygon nesting.
    pub fn rings(&self) -> Box<dyn Iterator<Item = &Ring> + '_> {
        match self {
            Geometry::Empty => Box::new(std::iter::empty()),
            Geometry::Polygon(rings) => Box::new(rings.iter()),
            Geometry::MultiPolygon(polygons) => Box::new(polygons.iter().flatten()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rings().all(|ring| ring.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub id: RegionId,
    pub geometry: Geometry,
}
