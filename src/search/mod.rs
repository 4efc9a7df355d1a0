//! Search Module
//!
//! Scholarly metadata search in two steps:
//! - `crossref` - keyword query against the Crossref works API
//! - `normalize` - raw work records to fixed-shape table rows

pub mod crossref;
pub mod normalize;

pub use crossref::{CrossRefClient, SearchError};
pub use normalize::{normalize, normalize_record};
