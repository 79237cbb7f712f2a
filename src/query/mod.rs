pub mod filters;
pub mod normalize;
pub mod pagination;
pub mod params;
pub mod predicate;
pub mod ranking;

pub use filters::{DealFilters, SearchFilters};
pub use pagination::{Page, PageKind};
pub use params::QueryParams;
