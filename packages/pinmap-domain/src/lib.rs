//! Pure place search logic: filter normalization, predicate evaluation, great-circle distance,
//! ranking and pagination.

pub mod filter;
pub mod geo;
pub mod list;
pub mod page;
pub mod place;
pub mod predicate;
pub mod ranking;
pub mod search;

pub use filter::{BudgetFilter, FilterError, RawLocation, RawSearchFilters, SearchFilters};
pub use geo::GeoPoint;
pub use page::Page;
pub use place::{BudgetType, PlaceFacts, PlaceStatus};
pub use ranking::{Candidate, SortKey};
