//! Route shape retrieval and geometry assembly.
//!
//! The MBTA V3 `/route_patterns` endpoint returns a JSON:API document:
//! route patterns reference a representative trip, trips reference a shape,
//! and shapes carry an encoded polyline. This module resolves that chain
//! into one GeoJSON feature per route.

use std::collections::HashMap;

use anyhow::Result;
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoValue};
use serde_json::json;
use tracing::{info, warn};

use crate::fetch::{HttpClient, fetch_json};
use crate::geometry::polyline::decode_polyline;
use crate::labels;

/// The parts of the route-pattern response the assembler cares about.
#[derive(Debug, Default)]
pub struct ShapePayload {
    /// shape id -> encoded polyline.
    pub shapes: HashMap<String, String>,
    /// trip id -> shape id.
    pub trip_shapes: HashMap<String, String>,
    /// (route id, representative trip id), in response order.
    pub patterns: Vec<(String, String)>,
}

/// Extracts shapes, trips, and patterns from a JSON:API document.
/// Resources with missing relationships are silently skipped.
pub fn parse_shape_response(doc: &serde_json::Value) -> ShapePayload {
    let mut payload = ShapePayload::default();

    if let Some(included) = doc["included"].as_array() {
        for item in included {
            match item["type"].as_str() {
                Some("shape") => {
                    if let (Some(id), Some(poly)) =
                        (item["id"].as_str(), item["attributes"]["polyline"].as_str())
                    {
                        payload.shapes.insert(id.to_string(), poly.to_string());
                    }
                }
                Some("trip") => {
                    if let (Some(id), Some(shape_id)) = (
                        item["id"].as_str(),
                        item["relationships"]["shape"]["data"]["id"].as_str(),
                    ) {
                        payload.trip_shapes.insert(id.to_string(), shape_id.to_string());
                    }
                }
                _ => {}
            }
        }
    }

    if let Some(data) = doc["data"].as_array() {
        for rp in data {
            if let (Some(route_id), Some(trip_id)) = (
                rp["relationships"]["route"]["data"]["id"].as_str(),
                rp["relationships"]["representative_trip"]["data"]["id"].as_str(),
            ) {
                payload
                    .patterns
                    .push((route_id.to_string(), trip_id.to_string()));
            }
        }
    }

    payload
}

/// Groups each route's decoded shapes into one GeoJSON feature.
///
/// One sequence yields a LineString; branched routes with several canonical
/// patterns yield a MultiLineString. A shape whose polyline fails to decode
/// is dropped with a warning, without affecting any other shape.
pub fn assemble_route_features(payload: &ShapePayload) -> FeatureCollection {
    let mut order: Vec<String> = Vec::new();
    let mut route_lines: HashMap<String, Vec<Vec<Vec<f64>>>> = HashMap::new();

    for (route_id, trip_id) in &payload.patterns {
        let Some(shape_id) = payload.trip_shapes.get(trip_id) else {
            continue;
        };
        let Some(encoded) = payload.shapes.get(shape_id) else {
            continue;
        };
        match decode_polyline(encoded) {
            Ok(points) if !points.is_empty() => {
                let line: Vec<Vec<f64>> = points.iter().map(|p| vec![p.lng, p.lat]).collect();
                if !route_lines.contains_key(route_id) {
                    order.push(route_id.clone());
                }
                route_lines.entry(route_id.clone()).or_default().push(line);
            }
            Ok(_) => {}
            Err(e) => {
                warn!(route_id = %route_id, shape_id = %shape_id, error = %e,
                    "Dropping malformed shape polyline");
            }
        }
    }

    let features = order
        .iter()
        .map(|route_id| {
            let lines = &route_lines[route_id];
            let geometry = if lines.len() == 1 {
                Geometry::new(GeoValue::LineString(lines[0].clone()))
            } else {
                Geometry::new(GeoValue::MultiLineString(lines.clone()))
            };
            Feature {
                bbox: None,
                geometry: Some(geometry),
                id: None,
                properties: Some(serde_json::Map::from_iter(vec![
                    ("routeId".to_string(), json!(route_id)),
                    ("color".to_string(), json!(labels::route_color(route_id))),
                    (
                        "displayName".to_string(),
                        json!(labels::route_display_name(route_id)),
                    ),
                    (
                        "routeType".to_string(),
                        json!(labels::route_type_for_route(route_id)),
                    ),
                ])),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Fetches canonical route patterns for the given routes and assembles
/// their geometries.
pub async fn fetch_route_shapes<C: HttpClient>(
    client: &C,
    base_url: &str,
    route_ids: &[String],
) -> Result<FeatureCollection> {
    let route_list = route_ids.join(",");
    // direction_id=0 keeps one direction per pattern to avoid duplicates
    let url = format!(
        "{base_url}/route_patterns\
         ?filter[route]={route_list}\
         &filter[canonical]=true\
         &filter[direction_id]=0\
         &include=representative_trip.shape\
         &fields[shape]=polyline"
    );

    info!(routes = route_ids.len(), "Fetching route shapes");
    let doc = fetch_json(client, &url, "application/vnd.api+json").await?;
    let payload = parse_shape_response(&doc);
    let collection = assemble_route_features(&payload);
    info!(features = collection.features.len(), "Route shapes assembled");
    Ok(collection)
}

/// Same as [`fetch_route_shapes`] but never fails: any error degrades to an
/// empty collection so the tabular aggregates can still ship without the
/// map overlay.
pub async fn fetch_route_shapes_or_empty<C: HttpClient>(
    client: &C,
    base_url: &str,
    route_ids: &[String],
) -> FeatureCollection {
    match fetch_route_shapes(client, base_url, route_ids).await {
        Ok(collection) => collection,
        Err(e) => {
            warn!(error = %e, "Could not fetch route shapes; dashboard will work without the map");
            FeatureCollection {
                bbox: None,
                features: Vec::new(),
                foreign_members: None,
            }
        }
    }
}
