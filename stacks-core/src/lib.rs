//! Core logic for the class book catalog: loading entry JSON from a
//! manifest-described source, contributor extraction, query evaluation
//! (search / contributor filter / sort), pagination, and the persisted
//! view state that survives navigating away from the index and back.

pub mod catalog;
pub mod collation;
pub mod contributors;
pub mod loader;
pub mod pagination;
pub mod query;
pub mod view_state;

pub use catalog::{Catalog, CatalogEntry};
pub use loader::{load, load_with_cancel, CatalogSource, LoadError};
pub use pagination::{paginate, CatalogPage, PAGE_SIZE};
pub use query::{evaluate, QueryState, SortMode};
pub use view_state::{ViewController, ViewStateStore};
