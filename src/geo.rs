use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value as JsonValue;

// ---------------------------------------------------------------------------
// Country outlines for the choropleth
// ---------------------------------------------------------------------------

/// Feature properties that may carry the ISO-3 country code.
const CODE_PROPERTIES: [&str; 4] = ["ISO_A3", "iso_a3", "ADM0_A3", "adm0_a3"];

/// Outer rings of one country, in (longitude, latitude).
#[derive(Debug, Clone, PartialEq)]
pub struct CountryShape {
    pub code: String,
    pub rings: Vec<Vec<[f64; 2]>>,
}

impl CountryShape {
    pub fn contains(&self, point: [f64; 2]) -> bool {
        self.rings.iter().any(|ring| ring_contains(ring, point))
    }
}

/// Country outlines keyed by ISO-3 code.
#[derive(Debug, Clone, Default)]
pub struct WorldShapes {
    pub shapes: BTreeMap<String, CountryShape>,
}

impl WorldShapes {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&text)
    }

    /// Parse a GeoJSON `FeatureCollection`.
    ///
    /// ```json
    /// { "type": "FeatureCollection",
    ///   "features": [ { "id": "FRA",
    ///                   "properties": { "ISO_A3": "FRA" },
    ///                   "geometry": { "type": "MultiPolygon", "coordinates": [...] } } ] }
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let root: JsonValue = serde_json::from_str(text).context("parsing GeoJSON")?;
        let features = root
            .get("features")
            .and_then(|f| f.as_array())
            .context("Expected a GeoJSON FeatureCollection")?;

        let mut shapes: BTreeMap<String, CountryShape> = BTreeMap::new();
        let mut skipped = 0usize;
        for feature in features {
            let (Some(code), Some(rings)) = (feature_code(feature), feature_rings(feature)) else {
                skipped += 1;
                continue;
            };
            shapes
                .entry(code.clone())
                .or_insert_with(|| CountryShape {
                    code,
                    rings: Vec::new(),
                })
                .rings
                .extend(rings);
        }
        if skipped > 0 {
            log::warn!("GeoJSON: skipped {skipped} features without a country code or polygon");
        }
        Ok(Self { shapes })
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn get(&self, code: &str) -> Option<&CountryShape> {
        self.shapes.get(code)
    }

    /// Code of the country under `point`, if any.
    pub fn hit(&self, point: [f64; 2]) -> Option<&str> {
        self.shapes
            .values()
            .find(|s| s.contains(point))
            .map(|s| s.code.as_str())
    }
}

fn feature_code(feature: &JsonValue) -> Option<String> {
    let props = feature.get("properties");
    CODE_PROPERTIES
        .iter()
        .filter_map(|key| props?.get(*key)?.as_str())
        .chain(feature.get("id").and_then(|id| id.as_str()))
        .find(|code| code.len() == 3 && *code != "-99")
        .map(str::to_string)
}

fn feature_rings(feature: &JsonValue) -> Option<Vec<Vec<[f64; 2]>>> {
    let geometry = feature.get("geometry")?;
    let coords = geometry.get("coordinates")?.as_array()?;
    let polygons: Vec<&JsonValue> = match geometry.get("type")?.as_str()? {
        "Polygon" => vec![geometry.get("coordinates")?],
        "MultiPolygon" => coords.iter().collect(),
        _ => return None,
    };
    let rings: Vec<Vec<[f64; 2]>> = polygons
        .into_iter()
        .filter_map(|poly| poly.as_array()?.first().and_then(parse_ring))
        .collect();
    (!rings.is_empty()).then_some(rings)
}

fn parse_ring(ring: &JsonValue) -> Option<Vec<[f64; 2]>> {
    ring.as_array()?
        .iter()
        .map(|pt| {
            let pt = pt.as_array()?;
            Some([pt.first()?.as_f64()?, pt.get(1)?.as_f64()?])
        })
        .collect()
}

/// Even-odd ray casting.
fn ring_contains(ring: &[[f64; 2]], [x, y]: [f64; 2]) -> bool {
    let mut inside = false;
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let [xi, yi] = ring[i];
        let [xj, yj] = ring[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "properties": { "ISO_A3": "SQR" },
              "geometry": { "type": "Polygon",
                            "coordinates": [[[0,0],[10,0],[10,10],[0,10],[0,0]], [[2,2],[3,2],[3,3],[2,2]]] } },
            { "type": "Feature", "id": "ISL", "properties": { "ISO_A3": "-99" },
              "geometry": { "type": "MultiPolygon",
                            "coordinates": [[[[20,0],[25,0],[25,5],[20,0]]], [[[30,0],[35,0],[35,5],[30,0]]]] } },
            { "type": "Feature", "properties": { "name": "Nowhere" },
              "geometry": { "type": "Point", "coordinates": [1,1] } }
        ]
    }"#;

    #[test]
    fn parses_polygons_and_multipolygons() {
        let world = WorldShapes::parse(SAMPLE).unwrap();
        assert_eq!(world.shapes.len(), 2);
        assert_eq!(world.get("SQR").unwrap().rings.len(), 1);
        assert_eq!(world.get("ISL").unwrap().rings.len(), 2);
    }

    #[test]
    fn hit_test_finds_country() {
        let world = WorldShapes::parse(SAMPLE).unwrap();
        assert_eq!(world.hit([5.0, 5.0]), Some("SQR"));
        assert_eq!(world.hit([34.0, 1.0]), Some("ISL"));
        assert_eq!(world.hit([50.0, 50.0]), None);
    }

    #[test]
    fn rejects_non_collections() {
        assert!(WorldShapes::parse("[1, 2, 3]").is_err());
        assert!(WorldShapes::parse("not json").is_err());
    }
}
