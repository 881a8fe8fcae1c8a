pub mod enrichment_pipeline;
pub mod sheet_pipeline;

pub use enrichment_pipeline::EnrichmentPipeline;
pub use sheet_pipeline::SheetPipeline;
