use crate::config::catalog_config::CatalogConfig;
use crate::core::{Pipeline, Storage};
use crate::domain::model::{CodeMap, CodedSheet, SheetRow};
use crate::domain::services::{self, ROWS_PER_COURSE};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation;
use csv::{ReaderBuilder, WriterBuilder};

/// 名冊代碼管道：將扁平名冊折成每課一列並補上課程代碼
pub struct SheetPipeline<S: Storage> {
    pub(crate) storage: S,
    pub(crate) config: CatalogConfig,
    pub(crate) codes: CodeMap,
}

impl<S: Storage> SheetPipeline<S> {
    pub fn new(storage: S, config: CatalogConfig, codes: CodeMap) -> Self {
        Self {
            storage,
            config,
            codes,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for SheetPipeline<S> {
    type Record = SheetRow;
    type Output = CodedSheet;

    async fn extract(&self) -> Result<Vec<SheetRow>> {
        let sheet = validation::validate_required_field("sheet", &self.config.sheet)?;

        tracing::debug!("Reading flat roster from: {}", sheet.roster_file);
        let raw = self.storage.read_file(&sheet.roster_file).await?;
        let text = String::from_utf8(raw).map_err(|e| EtlError::ProcessingError {
            message: format!("Roster {} is not valid UTF-8: {}", sheet.roster_file, e),
        })?;

        // .tsv 名冊用 Tab 分隔，其餘視為 CSV
        let delimiter = if sheet.roster_file.ends_with(".tsv") {
            b'\t'
        } else {
            b','
        };

        // 名冊沒有標題列，逐實體列取第一欄；空白列以空字串佔位，三列一組才不會錯位
        let mut rows = Vec::new();
        for line in text.lines() {
            if line.is_empty() {
                rows.push(SheetRow::new(""));
                continue;
            }

            let mut reader = ReaderBuilder::new()
                .has_headers(false)
                .flexible(true)
                .delimiter(delimiter)
                .from_reader(line.as_bytes());

            let first = match reader.records().next() {
                Some(record) => record?.get(0).unwrap_or("").to_string(),
                None => String::new(),
            };
            rows.push(SheetRow::new(first));
        }

        Ok(rows)
    }

    async fn transform(&self, data: Vec<SheetRow>) -> Result<CodedSheet> {
        let discarded_rows = data.len() % ROWS_PER_COURSE;
        if discarded_rows != 0 {
            tracing::warn!(
                "⚠️ Roster length {} is not a multiple of {}, discarding {} trailing row(s)",
                data.len(),
                ROWS_PER_COURSE,
                discarded_rows
            );
        }

        let rows = services::assign_codes(&data, &self.codes);
        let matched = rows.iter().filter(|row| !row.code.is_empty()).count();

        tracing::info!(
            "✅ Assigned codes to {}/{} courses ({} known codes)",
            matched,
            rows.len(),
            self.codes.len()
        );

        Ok(CodedSheet {
            rows,
            discarded_rows,
        })
    }

    async fn load(&self, sheet: CodedSheet) -> Result<String> {
        let output_path = format!(
            "{}/{}",
            self.config.output_path(),
            self.config.sheet_output_file()
        );

        // 標題列固定寫出，資料列交給 serde
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(vec![]);
        writer.write_record(["Course Code", "Course Name", "Type", "Description"])?;
        for row in &sheet.rows {
            writer.serialize(row)?;
        }

        let data = writer
            .into_inner()
            .map_err(|e| EtlError::ProcessingError {
                message: format!("CSV finalize failed: {}", e),
            })?;

        tracing::debug!("Writing {} bytes to storage", data.len());
        self.storage.write_file(&output_path, &data).await?;

        tracing::info!("📁 Coded roster saved: {}", output_path);
        Ok(output_path)
    }
}
