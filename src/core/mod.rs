pub mod etl;

pub use crate::domain::model::{
    CodeMap, CodedRow, CodedSheet, Course, CourseCode, CourseId, EnrichedCourse, EnrichmentResult,
    EnrichmentSummary, PrerequisiteTable, SheetRow,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
