pub mod config;
pub mod dataset;
pub mod dates;
pub mod error;
pub mod events;
pub mod grouping;
pub mod library;
pub mod model;
pub mod query;
pub mod search;
pub mod selection;
pub mod tasks {
    pub mod slideshow;
    pub mod upload;
}

pub use error::Error;
pub use grouping::{MonthGroup, group_by_expiry, group_by_month};
pub use library::PhotoLibrary;
pub use query::{CategoryFilter, PhotoQuery, Scope, SortKey};
