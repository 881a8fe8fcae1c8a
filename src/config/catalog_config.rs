use crate::core::ConfigProvider;
use crate::domain::model::PrerequisiteTable;
use crate::domain::services::DEFAULT_RELATED_LIMIT;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub catalog: CatalogInfo,
    pub input: InputConfig,
    #[serde(default)]
    pub enrich: EnrichConfig,
    pub load: LoadConfig,
    pub sheet: Option<SheetConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogInfo {
    pub name: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub courses_file: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrichConfig {
    pub related_limit: Option<usize>,
    #[serde(default)]
    pub prerequisites: PrerequisiteTable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_file: Option<String>,
    pub pretty: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetConfig {
    pub roster_file: String,
    pub output_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl CatalogConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CATALOG_HOME})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        // 使用正規表達式匹配 ${VAR_NAME} 格式
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("catalog.name", &self.catalog.name)?;

        // 驗證輸入檔案
        validation::validate_path("input.courses_file", &self.input.courses_file)?;
        validation::validate_file_extension(
            "input.courses_file",
            &self.input.courses_file,
            &["json"],
        )?;

        // 驗證輸出路徑
        validation::validate_path("load.output_path", &self.load.output_path)?;

        // 相關課程數量上限至少為 1
        validation::validate_positive_number("enrich.related_limit", self.related_limit(), 1)?;

        if let Some(sheet) = &self.sheet {
            validation::validate_path("sheet.roster_file", &sheet.roster_file)?;
            validation::validate_file_extension(
                "sheet.roster_file",
                &sheet.roster_file,
                &["csv", "tsv"],
            )?;
        }

        Ok(())
    }

    /// 取得課程目錄檔案路徑
    pub fn courses_file(&self) -> &str {
        &self.input.courses_file
    }

    /// 取得輸出路徑
    pub fn output_path(&self) -> &str {
        &self.load.output_path
    }

    /// 取得輸出檔名 (支援 {timestamp} 佔位符)
    pub fn output_file(&self) -> &str {
        self.load
            .output_file
            .as_deref()
            .unwrap_or("courses-enhanced.json")
    }

    pub fn pretty_output(&self) -> bool {
        self.load.pretty.unwrap_or(true)
    }

    /// 取得相關課程數量上限
    pub fn related_limit(&self) -> usize {
        self.enrich.related_limit.unwrap_or(DEFAULT_RELATED_LIMIT)
    }

    pub fn prerequisites(&self) -> &PrerequisiteTable {
        &self.enrich.prerequisites
    }

    pub fn roster_file(&self) -> Option<&str> {
        self.sheet.as_ref().map(|s| s.roster_file.as_str())
    }

    pub fn sheet_output_file(&self) -> &str {
        self.sheet
            .as_ref()
            .and_then(|s| s.output_file.as_deref())
            .unwrap_or("roster-with-codes.csv")
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for CatalogConfig {
    fn courses_file(&self) -> &str {
        &self.input.courses_file
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_file(&self) -> &str {
        self.output_file()
    }

    fn related_limit(&self) -> usize {
        self.related_limit()
    }

    fn prerequisites(&self) -> &PrerequisiteTable {
        &self.enrich.prerequisites
    }

    fn pretty_output(&self) -> bool {
        self.pretty_output()
    }
}

impl Validate for CatalogConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
