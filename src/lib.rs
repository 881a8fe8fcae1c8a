pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use app::pipelines::{EnrichmentPipeline, SheetPipeline};
pub use config::{cli::LocalStorage, CatalogConfig};
pub use core::etl::EtlEngine;
pub use utils::error::{EtlError, Result};
