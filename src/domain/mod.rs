pub mod heatmap;
pub mod host;
pub mod listing;
pub mod review;
pub mod stats;
