// src/domain/heatmap.rs
use serde::Serialize;

/// A weighted point for map rendering. `price` is only set on the price map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapPoint {
    pub lat: f64,
    pub lng: f64,
    pub intensity: f64,
    pub price: Option<f64>,
}
