//! Data module - CSV loading and chart data extraction

mod loader;
mod processor;

pub use loader::{DataLoader, LoaderError};
pub use processor::{
    Category, CategoryKey, DataProcessor, FacetGroup, HueSeries, LineRecord, ProcessorError,
};
