use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Envelope;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MapCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapHeatmapData {
    #[serde(default)]
    pub coordinates: Vec<MapCoordinate>,
    #[serde(default)]
    pub intensity_values: Vec<f64>,
    #[serde(default)]
    pub color_scale: BTreeMap<String, String>,
}

impl MapHeatmapData {
    /// Coordinates paired with their intensity. Extra entries on either side
    /// are dropped.
    pub fn points(&self) -> impl Iterator<Item = (MapCoordinate, f64)> + '_ {
        self.coordinates
            .iter()
            .copied()
            .zip(self.intensity_values.iter().copied())
    }
}

pub type MapHeatmapResponse = Envelope<MapHeatmapData>;
pub type MapAnalysisTypesResponse = Envelope<Vec<String>>;

/// Analyses the radius endpoint accepts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RadiusAnalysisType {
    #[default]
    Comprehensive,
    Competition,
    Opportunity,
}

/// Body of `POST /map-visualization/radius-analysis`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RadiusAnalysisRequest {
    pub center_lat: f64,
    pub center_lng: f64,
    pub radius_km: f64,
    #[serde(default)]
    pub analysis_type: RadiusAnalysisType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heatmap_points_pair_up_to_shorter_side() {
        let data = MapHeatmapData {
            coordinates: vec![
                MapCoordinate { latitude: 36.33, longitude: 127.43 },
                MapCoordinate { latitude: 36.35, longitude: 127.38 },
            ],
            intensity_values: vec![0.9],
            color_scale: BTreeMap::new(),
        };
        let points: Vec<_> = data.points().collect();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].1, 0.9);
    }

    #[test]
    fn radius_request_serializes_analysis_type_snake_case() {
        let body = serde_json::to_value(RadiusAnalysisRequest {
            center_lat: 36.3504,
            center_lng: 127.3845,
            radius_km: 1.5,
            analysis_type: RadiusAnalysisType::Competition,
        })
        .unwrap();
        assert_eq!(body["analysis_type"], "competition");
        assert_eq!(body["radius_km"], 1.5);
    }
}
