//! TopoJSON decoding.
//!
//! A topology stores every boundary segment once, as an "arc", and polygons
//! reference arcs by index (`~i` walks arc `i` backwards). Arcs may be
//! quantized: positions are then delta-encoded integers that the optional
//! `transform` maps back to output coordinates.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use crate::region::{Geometry, Region, RegionId, Ring};

#[derive(Debug, Error, PartialEq)]
pub enum TopologyError {
    #[error("topology has no object named {0:?}")]
    MissingObject(String),
    #[error("object {0:?} is not a GeometryCollection")]
    NotACollection(String),
    #[error("polygon {index} in collection has no id")]
    MissingId { index: usize },
    #[error("arc index {index} out of range ({count} arcs)")]
    ArcOutOfRange { index: i64, count: usize },
    #[error("arc {arc} has a position with fewer than two coordinates")]
    MalformedPosition { arc: usize },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub transform: Option<Transform>,
    pub objects: HashMap<String, TopoObject>,
    pub arcs: Vec<Vec<Vec<f64>>>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

/// One member of a topology's `objects` tree.
///
/// `type` may be `null` (a geometry object without geometry). Such members,
/// like points and lines, decode to [`TopoObject::Unsupported`].
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawObject")]
pub enum TopoObject {
    GeometryCollection {
        geometries: Vec<TopoObject>,
    },
    Polygon {
        id: Option<RegionId>,
        arcs: Vec<Vec<i64>>,
    },
    MultiPolygon {
        id: Option<RegionId>,
        arcs: Vec<Vec<Vec<i64>>>,
    },
    /// Points, lines and null geometries carry no fillable area.
    Unsupported,
}

#[derive(Deserialize)]
struct RawObject {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    id: Option<RegionId>,
    #[serde(default)]
    arcs: Option<ArcRefs>,
    #[serde(default)]
    geometries: Option<Vec<TopoObject>>,
}

/// Arc references at any nesting depth; the member type fixes the depth.
#[derive(Deserialize)]
#[serde(untagged)]
enum ArcRefs {
    Index(i64),
    Nested(Vec<ArcRefs>),
}

impl ArcRefs {
    fn into_nested(self) -> Result<Vec<ArcRefs>, String> {
        match self {
            ArcRefs::Nested(items) => Ok(items),
            ArcRefs::Index(index) => Err(format!("expected an array of arcs, found index {index}")),
        }
    }

    fn into_ring(self) -> Result<Vec<i64>, String> {
        self.into_nested()?
            .into_iter()
            .map(|item| match item {
                ArcRefs::Index(index) => Ok(index),
                ArcRefs::Nested(_) => Err("expected an arc index, found an array".to_owned()),
            })
            .collect()
    }

    fn into_rings(self) -> Result<Vec<Vec<i64>>, String> {
        self.into_nested()?.into_iter().map(ArcRefs::into_ring).collect()
    }

    fn into_polygons(self) -> Result<Vec<Vec<Vec<i64>>>, String> {
        self.into_nested()?.into_iter().map(ArcRefs::into_rings).collect()
    }
}

impl TryFrom<RawObject> for TopoObject {
    type Error = String;

    fn try_from(raw: RawObject) -> Result<Self, Self::Error> {
        Ok(match raw.kind.as_deref() {
            Some("GeometryCollection") => TopoObject::GeometryCollection {
                geometries: raw.geometries.unwrap_or_default(),
            },
            Some("Polygon") => TopoObject::Polygon {
                id: raw.id,
                arcs: raw.arcs.map(ArcRefs::into_rings).transpose()?.unwrap_or_default(),
            },
            Some("MultiPolygon") => TopoObject::MultiPolygon {
                id: raw.id,
                arcs: raw
                    .arcs
                    .map(ArcRefs::into_polygons)
                    .transpose()?
                    .unwrap_or_default(),
            },
            _ => TopoObject::Unsupported,
        })
    }
}

impl Topology {
    pub fn object_names(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    /// Convert the named GeometryCollection into regions, in collection order.
    ///
    /// Unsupported members (points, lines, null geometries) have no id to
    /// join on and are skipped; polygons without an id are an error.
    pub fn regions(&self, object: &str) -> Result<Vec<Region>, TopologyError> {
        let root = self
            .objects
            .get(object)
            .ok_or_else(|| TopologyError::MissingObject(object.to_owned()))?;
        let TopoObject::GeometryCollection { geometries } = root else {
            return Err(TopologyError::NotACollection(object.to_owned()));
        };

        let arcs = self.decode_arcs()?;
        let mut regions = Vec::with_capacity(geometries.len());
        collect_regions(geometries, &arcs, &mut regions)?;
        Ok(regions)
    }

    /// Absolute coordinates for every arc, with the transform applied.
    fn decode_arcs(&self) -> Result<Vec<Ring>, TopologyError> {
        self.arcs
            .iter()
            .enumerate()
            .map(|(arc_index, arc)| {
                let mut x = 0.0;
                let mut y = 0.0;
                arc.iter()
                    .map(|position| {
                        let [px, py] = match position.as_slice() {
                            [px, py, ..] => [*px, *py],
                            _ => return Err(TopologyError::MalformedPosition { arc: arc_index }),
                        };
                        Ok(match self.transform {
                            Some(t) => {
                                x += px;
                                y += py;
                                [x * t.scale[0] + t.translate[0], y * t.scale[1] + t.translate[1]]
                            }
                            None => [px, py],
                        })
                    })
                    .collect()
            })
            .collect()
    }
}

fn collect_regions(
    geometries: &[TopoObject],
    arcs: &[Ring],
    out: &mut Vec<Region>,
) -> Result<(), TopologyError> {
    for (index, geometry) in geometries.iter().enumerate() {
        match geometry {
            TopoObject::GeometryCollection { geometries } => {
                collect_regions(geometries, arcs, out)?;
            }
            TopoObject::Polygon { id, arcs: rings } => {
                let id = id.clone().ok_or(TopologyError::MissingId { index })?;
                out.push(Region {
                    id,
                    geometry: Geometry::Polygon(polygon(rings, arcs)?),
                });
            }
            TopoObject::MultiPolygon { id, arcs: polygons } => {
                let id = id.clone().ok_or(TopologyError::MissingId { index })?;
                let polygons = polygons
                    .iter()
                    .map(|rings| polygon(rings, arcs))
                    .collect::<Result<_, _>>()?;
                out.push(Region {
                    id,
                    geometry: Geometry::MultiPolygon(polygons),
                });
            }
            TopoObject::Unsupported => {}
        }
    }
    Ok(())
}

fn polygon(rings: &[Vec<i64>], arcs: &[Ring]) -> Result<Vec<Ring>, TopologyError> {
    rings.iter().map(|refs| ring(refs, arcs)).collect()
}

/// Stitch arcs into one ring. Consecutive arcs share an endpoint, so the
/// last point collected so far is dropped before appending the next arc.
fn ring(refs: &[i64], arcs: &[Ring]) -> Result<Ring, TopologyError> {
    let mut points: Ring = Vec::new();
    for &index in refs {
        let (arc_index, reversed) = if index < 0 {
            (!index, true)
        } else {
            (index, false)
        };
        let arc = usize::try_from(arc_index)
            .ok()
            .and_then(|i| arcs.get(i))
            .ok_or(TopologyError::ArcOutOfRange {
                index,
                count: arcs.len(),
            })?;

        points.pop();
        if reversed {
            points.extend(arc.iter().rev().copied());
        } else {
            points.extend(arc.iter().copied());
        }
    }

    // Degenerate rings are padded so they still close.
    if let Some(&first) = points.first() {
        while points.len() < 4 {
            points.push(first);
        }
    }
    Ok(points)
}
