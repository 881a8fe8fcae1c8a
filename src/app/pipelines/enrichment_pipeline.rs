use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{Course, EnrichmentResult};
use crate::domain::services;
use crate::utils::error::Result;

/// 課程目錄增強管道：為每門課程補上先修、相關與反向連結欄位
pub struct EnrichmentPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
}

impl<S: Storage, C: ConfigProvider> EnrichmentPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    /// 解析輸出檔名，支援 {timestamp} 佔位符
    fn resolve_output_file(&self) -> String {
        self.config.output_file().replace(
            "{timestamp}",
            &chrono::Utc::now().format("%Y%m%d_%H%M%S").to_string(),
        )
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for EnrichmentPipeline<S, C> {
    type Record = Course;
    type Output = EnrichmentResult;

    async fn extract(&self) -> Result<Vec<Course>> {
        let path = self.config.courses_file();
        tracing::debug!("Reading course catalog from: {}", path);

        let raw = self.storage.read_file(path).await?;
        let courses: Vec<Course> = serde_json::from_slice(&raw)?;

        // 同名課程以最後一筆為準，先警告再繼續
        for name in services::find_duplicate_names(&courses) {
            tracing::warn!("⚠️ Duplicate course name '{}', later entry wins", name);
        }

        Ok(courses)
    }

    async fn transform(&self, data: Vec<Course>) -> Result<EnrichmentResult> {
        let enriched = services::enrich(
            &data,
            self.config.prerequisites(),
            self.config.related_limit(),
        );
        let summary = services::summarize(&enriched);

        tracing::info!(
            "✅ Enrichment complete: {} with prerequisites, {} acting as prerequisite, {} with related",
            summary.with_prerequisites,
            summary.acting_as_prerequisite,
            summary.with_related
        );

        Ok(EnrichmentResult {
            courses: enriched,
            summary,
        })
    }

    async fn load(&self, result: EnrichmentResult) -> Result<String> {
        let file_name = self.resolve_output_file();
        let output_path = format!("{}/{}", self.config.output_path(), file_name);

        // 依設定選擇縮排或緊湊 JSON
        let json_data = if self.config.pretty_output() {
            serde_json::to_vec_pretty(&result.courses)?
        } else {
            serde_json::to_vec(&result.courses)?
        };

        tracing::debug!("Writing {} bytes to storage", json_data.len());
        self.storage.write_file(&output_path, &json_data).await?;

        tracing::info!(
            "📊 Catalog summary: {}/{} courses carry prerequisites",
            result.summary.with_prerequisites,
            result.summary.total_courses
        );
        tracing::info!("📁 Enhanced catalog saved: {}", output_path);
        Ok(output_path)
    }
}
