// Service exports
pub mod dataset;
pub mod gazetteer;

pub use dataset::{Dataset, DatasetError};
pub use gazetteer::Gazetteer;
