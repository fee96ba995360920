pub mod error;
pub mod ids;
pub mod metadata;
pub mod statistics;
pub mod types;

pub use error::{CodeMapError, Result};
pub use ids::*;
pub use metadata::*;
pub use statistics::*;
pub use types::*;
