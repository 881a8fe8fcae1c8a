use catalog_etl::config::catalog_config::{CatalogConfig, SheetConfig};
use catalog_etl::core::Storage;
use catalog_etl::domain::model::{CodeMap, Course};
use catalog_etl::utils::{logger, validation::Validate};
use catalog_etl::{EtlEngine, LocalStorage, SheetPipeline};
use clap::Parser;

#[derive(Parser)]
#[command(name = "sheet-codes")]
#[command(about = "Fold a flat course roster into rows and fill in course codes")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "catalog-etl.toml")]
    config: String,

    /// Override roster file from config
    #[arg(long)]
    roster: Option<String>,

    /// Override courses file from config
    #[arg(long)]
    courses: Option<String>,

    /// Override output path from config
    #[arg(long)]
    output: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting roster code assignment");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let mut config = match CatalogConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    if let Some(roster) = args.roster.clone() {
        tracing::info!("🔧 Roster file overridden to: {}", roster);
        match config.sheet.as_mut() {
            Some(sheet) => sheet.roster_file = roster,
            None => {
                config.sheet = Some(SheetConfig {
                    roster_file: roster,
                    output_file: None,
                });
            }
        }
    }

    if let Some(courses) = args.courses.clone() {
        tracing::info!("🔧 Courses file overridden to: {}", courses);
        config.input.courses_file = courses;
    }

    if let Some(output) = args.output.clone() {
        tracing::info!("🔧 Output path overridden to: {}", output);
        config.load.output_path = output;
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    // 顯示配置摘要
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        perform_dry_run(&config);
        return Ok(());
    }

    // 決定監控設定
    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());

    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(".".to_string());

    // 代碼對照表來自課程目錄
    let courses = match load_courses(&storage, config.courses_file()).await {
        Ok(courses) => courses,
        Err(e) => {
            tracing::error!("❌ Failed to load course catalog: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    let codes = CodeMap::from_courses(&courses);
    tracing::info!(
        "📖 Loaded {} courses, {} carry a course code",
        courses.len(),
        codes.len()
    );

    // 創建存儲和名冊管道
    let pipeline = SheetPipeline::new(storage, config, codes);

    // 創建 ETL 引擎並運行
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ ETL process completed successfully!");
            tracing::info!("📁 Output saved to: {}", output_path);
            println!("✅ ETL process completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            // 輸出用戶友好的錯誤信息
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                catalog_etl::utils::error::ErrorSeverity::Low => 0, // 警告，但成功
                catalog_etl::utils::error::ErrorSeverity::Medium => 2, // 重試錯誤
                catalog_etl::utils::error::ErrorSeverity::High => 1, // 處理錯誤
                catalog_etl::utils::error::ErrorSeverity::Critical => 3, // 系統錯誤
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn load_courses(storage: &LocalStorage, path: &str) -> catalog_etl::Result<Vec<Course>> {
    let raw = storage.read_file(path).await?;
    let courses = serde_json::from_slice(&raw)?;
    Ok(courses)
}

fn display_config_summary(config: &CatalogConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!(
        "  Catalog: {} v{}",
        config.catalog.name, config.catalog.version
    );
    println!("  Courses: {}", config.courses_file());
    println!(
        "  Roster: {}",
        config.roster_file().unwrap_or("(not configured)")
    );
    println!(
        "  Output: {}/{}",
        config.output_path(),
        config.sheet_output_file()
    );

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &CatalogConfig) {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📄 Roster Source:");
    println!(
        "  File: {}",
        config.roster_file().unwrap_or("(not configured)")
    );
    println!("  Rows per course: 3 (name, type, description)");

    println!();
    println!("📖 Code Source:");
    println!("  Catalog: {}", config.courses_file());
    println!("  Match key: course name + type");

    println!();
    println!("💾 Output Configuration:");
    println!("  Path: {}", config.output_path());
    println!("  File: {}", config.sheet_output_file());

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}
