use anyhow::Result;
use catalog_etl::config::catalog_config::CatalogConfig;
use catalog_etl::utils::error::{ErrorSeverity, EtlError};
use catalog_etl::{EnrichmentPipeline, EtlEngine, LocalStorage};
use tempfile::TempDir;

fn sample_catalog() -> serde_json::Value {
    serde_json::json!([
        {
            "id": 1,
            "name": "Basic Instructor Fundamentals",
            "type": "Instructor",
            "level": "Basic",
            "courseCode": "DSAS 13001",
            "durationHours": 16
        },
        {
            "id": 2,
            "name": "Advanced Instructor Fundamentals",
            "type": "Instructor",
            "level": "Advanced",
            "courseCode": "DSAS 23001"
        },
        {
            "id": 3,
            "name": "Expert Instructor Track",
            "type": "Instructor",
            "level": "Expert",
            "courseCode": "DSAS 33001"
        },
        {
            "id": 4,
            "name": "Data Stewardship Primer",
            "type": "Steward",
            "level": "Basic",
            "courseCode": "DSAS 14501"
        },
        {
            "id": "legacy-7",
            "name": "Legacy Facilitation Workshop",
            "type": "Facilitator",
            "level": "Basic"
        }
    ])
}

fn catalog_config(extra: &str) -> String {
    format!(
        r#"
[catalog]
name = "integration-test"
description = "Full enrichment run"
version = "1.0"

[input]
courses_file = "courses.json"

[load]
output_path = "output"
{extra}
"#,
        extra = extra
    )
}

/// 完整流程：讀取目錄、補齊三個欄位、寫出 JSON
#[tokio::test]
async fn test_end_to_end_catalog_enrichment() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let temp_path = temp_dir.path().to_str().unwrap();

    tokio::fs::write(
        temp_dir.path().join("courses.json"),
        sample_catalog().to_string(),
    )
    .await?;

    let config_content = catalog_config(
        r#"
[enrich.prerequisites]
"Advanced Instructor Fundamentals" = ["Basic Instructor Fundamentals"]
"Expert Instructor Track" = ["Basic Instructor Fundamentals", "Advanced Instructor Fundamentals"]
"Legacy Facilitation Workshop" = ["Retired Course"]
"#,
    );
    let config_path = temp_dir.path().join("catalog-etl.toml");
    tokio::fs::write(&config_path, config_content).await?;
    let config = CatalogConfig::from_file(&config_path)?;

    let storage = LocalStorage::new(temp_path.to_string());
    let pipeline = EnrichmentPipeline::new(storage, config);
    let engine = EtlEngine::new(pipeline);

    let output_path = engine.run().await?;
    assert_eq!(output_path, "output/courses-enhanced.json");

    let written = tokio::fs::read(temp_dir.path().join(&output_path)).await?;
    let enriched: Vec<serde_json::Value> = serde_json::from_slice(&written)?;

    // 長度與 id 順序與輸入一致
    assert_eq!(enriched.len(), 5);
    let ids: Vec<&serde_json::Value> = enriched.iter().map(|c| c.get("id").unwrap()).collect();
    assert_eq!(
        ids,
        vec![
            &serde_json::json!(1),
            &serde_json::json!(2),
            &serde_json::json!(3),
            &serde_json::json!(4),
            &serde_json::json!("legacy-7")
        ]
    );

    // 未知欄位原樣保留
    assert_eq!(enriched[0]["durationHours"], serde_json::json!(16));

    // 先修欄位來自表格，無表格條目時為空
    assert_eq!(enriched[0]["prerequisites"], serde_json::json!([]));
    assert_eq!(
        enriched[1]["prerequisites"],
        serde_json::json!(["Basic Instructor Fundamentals"])
    );
    assert_eq!(
        enriched[2]["prerequisites"],
        serde_json::json!([
            "Basic Instructor Fundamentals",
            "Advanced Instructor Fundamentals"
        ])
    );

    // 反向連結依名稱排序，帶課程代碼
    assert_eq!(
        enriched[0]["prerequisiteFor"],
        serde_json::json!([
            {"id": 2, "name": "Advanced Instructor Fundamentals", "code": "DSAS 23001"},
            {"id": 3, "name": "Expert Instructor Track", "code": "DSAS 33001"}
        ])
    );

    // 相關課程：同科目同家族，不含自己，保持輸入順序
    assert_eq!(
        enriched[0]["relatedCourses"],
        serde_json::json!([
            {"id": 2, "name": "Advanced Instructor Fundamentals", "code": "DSAS 23001", "level": "Advanced"},
            {"id": 3, "name": "Expert Instructor Track", "code": "DSAS 33001", "level": "Expert"}
        ])
    );

    // 家族不同（45 對 30）與缺代碼的課程沒有相關課程
    assert_eq!(enriched[3]["relatedCourses"], serde_json::json!([]));
    assert_eq!(enriched[4]["relatedCourses"], serde_json::json!([]));

    // 幽靈先修名稱原樣保留，不產生反向連結
    assert_eq!(
        enriched[4]["prerequisites"],
        serde_json::json!(["Retired Course"])
    );
    for course in &enriched {
        let dependents = course["prerequisiteFor"].as_array().unwrap();
        assert!(dependents
            .iter()
            .all(|d| d["name"] != serde_json::json!("Legacy Facilitation Workshop")));
    }

    println!("✅ End-to-end enrichment test passed!");
    Ok(())
}

/// 沒有先修表時兩個連結欄位都是空陣列
#[tokio::test]
async fn test_prerequisites_default_empty_without_table() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let temp_path = temp_dir.path().to_str().unwrap();

    tokio::fs::write(
        temp_dir.path().join("courses.json"),
        sample_catalog().to_string(),
    )
    .await?;

    let config = CatalogConfig::from_toml_str(&catalog_config(""))?;
    let storage = LocalStorage::new(temp_path.to_string());
    let engine = EtlEngine::new(EnrichmentPipeline::new(storage, config));

    let output_path = engine.run().await?;
    let written = tokio::fs::read(temp_dir.path().join(&output_path)).await?;
    let enriched: Vec<serde_json::Value> = serde_json::from_slice(&written)?;

    for course in &enriched {
        assert_eq!(course["prerequisites"], serde_json::json!([]));
        assert_eq!(course["prerequisiteFor"], serde_json::json!([]));
    }

    Ok(())
}

/// 目錄檔案不存在時整個流程以 I/O 錯誤收場
#[tokio::test]
async fn test_missing_catalog_file_surfaces_io_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let temp_path = temp_dir.path().to_str().unwrap();

    let config = CatalogConfig::from_toml_str(&catalog_config(""))?;
    let storage = LocalStorage::new(temp_path.to_string());
    let engine = EtlEngine::new(EnrichmentPipeline::new(storage, config));

    let err = engine.run().await.unwrap_err();
    assert!(matches!(err, EtlError::IoError(_)));
    assert_eq!(err.severity(), ErrorSeverity::Critical);

    Ok(())
}

/// 監控開啟時流程照常完成
#[tokio::test]
async fn test_monitored_run_produces_output() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let temp_path = temp_dir.path().to_str().unwrap();

    tokio::fs::write(
        temp_dir.path().join("courses.json"),
        sample_catalog().to_string(),
    )
    .await?;

    let config = CatalogConfig::from_toml_str(&catalog_config(""))?;
    let storage = LocalStorage::new(temp_path.to_string());
    let engine =
        EtlEngine::new_with_monitoring(EnrichmentPipeline::new(storage, config), true);

    let output_path = engine.run().await?;
    assert!(temp_dir.path().join(&output_path).exists());

    Ok(())
}

/// pretty = false 時輸出為單行緊湊 JSON
#[tokio::test]
async fn test_compact_output_when_pretty_disabled() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let temp_path = temp_dir.path().to_str().unwrap();

    tokio::fs::write(
        temp_dir.path().join("courses.json"),
        sample_catalog().to_string(),
    )
    .await?;

    let mut config = CatalogConfig::from_toml_str(&catalog_config(""))?;
    config.load.pretty = Some(false);

    let storage = LocalStorage::new(temp_path.to_string());
    let engine = EtlEngine::new(EnrichmentPipeline::new(storage, config));

    let output_path = engine.run().await?;
    let written = tokio::fs::read(temp_dir.path().join(&output_path)).await?;
    let text = String::from_utf8(written)?;

    assert!(!text.contains('\n'));
    assert!(text.starts_with('['));

    Ok(())
}
