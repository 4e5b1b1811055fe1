pub mod pagination;

pub use pagination::{PageLimits, PageRequest, PaginationMeta};

// Common shared types and traits
pub trait Paginated {
    /// Number of rows matching the filter, ignoring limit and offset.
    fn total(&self) -> i64;
}
