pub mod analysis;
pub mod datasets;
pub mod error;
pub mod load;
pub mod logging;
pub mod pipeline;
pub mod recipe;
pub mod store;
pub mod table;

pub use error::CleanseError;
pub use pipeline::{Cleansed, Origin, Pipeline};
pub use recipe::{Recipe, Step};
