//! Spike vertex removal for polygon rings
//!
//! Digitizing and raster-to-vector conversion leave needle-shaped slivers:
//! vertices whose interior angle is nearly zero. This pass removes such
//! vertices in a single ordered sweep per ring.

use geo::{Coord, Geometry, LineString, MultiPolygon, Polygon};
use mapclean_core::vector::FeatureCollection;
use mapclean_core::{Error, Result};
use tracing::debug;

/// Parameters for spike removal
#[derive(Debug, Clone)]
pub struct SpikeParams {
    /// Vertices with an interior angle strictly below this many degrees
    /// are removed
    pub threshold_degrees: f64,
    /// If set, a ring stops shedding vertices once this many survive,
    /// keeping any remaining spikes
    pub min_ring_vertices: Option<usize>,
}

impl Default for SpikeParams {
    fn default() -> Self {
        Self {
            threshold_degrees: 20.0,
            min_ring_vertices: None,
        }
    }
}

impl SpikeParams {
    /// Validate that the angle threshold lies within `(0, 180]`
    pub fn validate(&self) -> Result<()> {
        if !self.threshold_degrees.is_finite()
            || self.threshold_degrees <= 0.0
            || self.threshold_degrees > 180.0
        {
            return Err(Error::InvalidParameter {
                name: "threshold_degrees",
                value: self.threshold_degrees.to_string(),
                reason: "spike angle threshold must be within (0, 180]".to_string(),
            });
        }
        Ok(())
    }
}

/// Interior angle at `curr` between the segments to `prev` and `next`, in
/// degrees within `[0, 180]`.
///
/// Returns `None` when either segment has zero length (duplicate
/// consecutive vertices); such vertices carry no usable angle and must be
/// kept. The cosine is clamped to `[-1, 1]` so near-colinear segments
/// cannot produce NaN through floating point drift.
pub fn vertex_angle_degrees(prev: Coord<f64>, curr: Coord<f64>, next: Coord<f64>) -> Option<f64> {
    let v1 = (prev.x - curr.x, prev.y - curr.y);
    let v2 = (next.x - curr.x, next.y - curr.y);
    let n1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
    let n2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();
    if n1 == 0.0 || n2 == 0.0 {
        return None;
    }

    let cos = ((v1.0 * v2.0 + v1.1 * v2.1) / (n1 * n2)).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// Remove spike vertices from a ring.
///
/// The ring is treated as closed whether or not the closing vertex is
/// present. Every original vertex is visited once, in order; the angle at
/// each vertex is measured against its current surviving neighbors, so
/// removing one spike can expose the next within the same sweep. The
/// cleaned ring keeps the surviving vertices in their original order and
/// is returned closed, together with the number of vertices removed.
///
/// Without a `min_ring_vertices` floor a ring of nothing but spikes can
/// degenerate below three vertices; set the floor to preserve ring
/// validity at the cost of keeping residual spikes.
pub fn remove_ring_spikes(
    ring: &LineString<f64>,
    params: &SpikeParams,
) -> Result<(LineString<f64>, usize)> {
    params.validate()?;

    let coords = &ring.0;
    let n = if coords.len() > 1 && ring.is_closed() {
        coords.len() - 1
    } else {
        coords.len()
    };
    if n < 3 {
        return Ok((ring.clone(), 0));
    }

    // Circular doubly linked list over the distinct ring vertices.
    let mut prev: Vec<usize> = (0..n).map(|i| (i + n - 1) % n).collect();
    let mut next: Vec<usize> = (0..n).map(|i| (i + 1) % n).collect();
    let mut alive = vec![true; n];
    let mut survivors = n;

    for i in 0..n {
        if let Some(floor) = params.min_ring_vertices
            && survivors <= floor
        {
            break;
        }

        let angle = vertex_angle_degrees(coords[prev[i]], coords[i], coords[next[i]]);
        if let Some(angle) = angle
            && angle < params.threshold_degrees
        {
            next[prev[i]] = next[i];
            prev[next[i]] = prev[i];
            alive[i] = false;
            survivors -= 1;
        }
    }

    let removed = n - survivors;
    if removed == 0 {
        return Ok((ring.clone(), 0));
    }

    let mut cleaned: Vec<Coord<f64>> = (0..n).filter(|&i| alive[i]).map(|i| coords[i]).collect();
    if let Some(&first) = cleaned.first() {
        cleaned.push(first);
    }
    Ok((LineString::new(cleaned), removed))
}

/// Remove spikes from every ring of a polygon.
///
/// Interior rings get the same treatment as the exterior and are never
/// dropped, even when they degenerate.
pub fn remove_polygon_spikes(
    polygon: &Polygon<f64>,
    params: &SpikeParams,
) -> Result<(Polygon<f64>, usize)> {
    let (exterior, mut removed) = remove_ring_spikes(polygon.exterior(), params)?;

    let mut interiors = Vec::with_capacity(polygon.interiors().len());
    for ring in polygon.interiors() {
        let (cleaned, count) = remove_ring_spikes(ring, params)?;
        removed += count;
        interiors.push(cleaned);
    }

    Ok((Polygon::new(exterior, interiors), removed))
}

/// Remove spike vertices from a geometry.
///
/// Polygons and multipolygons are cleaned ring by ring; every other
/// geometry kind passes through unchanged with a removal count of zero.
pub fn remove_spikes(
    geom: &Geometry<f64>,
    params: &SpikeParams,
) -> Result<(Geometry<f64>, usize)> {
    params.validate()?;

    match geom {
        Geometry::Polygon(p) => {
            let (cleaned, removed) = remove_polygon_spikes(p, params)?;
            Ok((Geometry::Polygon(cleaned), removed))
        }
        Geometry::MultiPolygon(mp) => {
            let mut removed = 0;
            let mut polygons = Vec::with_capacity(mp.0.len());
            for p in &mp.0 {
                let (cleaned, count) = remove_polygon_spikes(p, params)?;
                removed += count;
                polygons.push(cleaned);
            }
            Ok((Geometry::MultiPolygon(MultiPolygon::new(polygons)), removed))
        }
        other => Ok((other.clone(), 0)),
    }
}

/// Remove spikes across a whole feature collection.
///
/// Attributes, IDs and geometry-less features pass through untouched.
/// Returns the cleaned collection and the total number of vertices removed.
pub fn remove_spikes_features(
    collection: &FeatureCollection,
    params: &SpikeParams,
) -> Result<(FeatureCollection, usize)> {
    params.validate()?;

    let mut cleaned = FeatureCollection::new();
    let mut total = 0;
    for feature in collection.iter() {
        let mut out = feature.clone();
        if let Some(geom) = &feature.geometry {
            let (geometry, removed) = remove_spikes(geom, params)?;
            total += removed;
            out.geometry = Some(geometry);
        }
        cleaned.push(out);
    }

    debug!(features = cleaned.len(), removed = total, "spike removal");
    Ok((cleaned, total))
}
