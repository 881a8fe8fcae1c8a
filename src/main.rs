use catalog_etl::config::catalog_config::CatalogConfig;
use catalog_etl::utils::{logger, validation::Validate};
use catalog_etl::{EnrichmentPipeline, EtlEngine, LocalStorage};
use clap::Parser;

#[derive(Parser)]
#[command(name = "catalog-etl")]
#[command(about = "Training course catalog enrichment with TOML configuration support")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "catalog-etl.toml")]
    config: String,

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

    tracing::info!("🚀 Starting course catalog enrichment");
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
        perform_dry_run(&config).await?;
        return Ok(());
    }

    // 決定監控設定
    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());

    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 創建存儲和增強管道
    let storage = LocalStorage::new(".".to_string());
    let pipeline = EnrichmentPipeline::new(storage, config);

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

fn display_config_summary(config: &CatalogConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!(
        "  Catalog: {} v{}",
        config.catalog.name, config.catalog.version
    );
    println!("  Courses: {}", config.courses_file());
    println!("  Output: {}/{}", config.output_path(), config.output_file());
    println!("  Related limit: {}", config.related_limit());
    println!("  Prerequisite entries: {}", config.prerequisites().len());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

async fn perform_dry_run(config: &CatalogConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Dry Run Analysis:");
    println!();

    // 課程目錄分析
    println!("📖 Course Catalog:");
    println!("  File: {}", config.courses_file());

    // 增強規則分析
    println!();
    println!("⚙️ Enrichment Plan:");
    println!("  Related course limit: {}", config.related_limit());
    println!(
        "  Prerequisite table entries: {}",
        config.prerequisites().len()
    );
    for (name, requires) in config.prerequisites().iter() {
        println!("  {} <- {}", name, requires.join(", "));
    }

    // 輸出分析
    println!();
    println!("💾 Output Configuration:");
    println!("  Path: {}", config.output_path());
    println!("  File: {}", config.output_file());
    println!("  Pretty JSON: {}", config.pretty_output());

    if let Some(roster) = config.roster_file() {
        println!();
        println!("📄 Sheet Configuration:");
        println!("  Roster: {}", roster);
        println!("  Output: {}", config.sheet_output_file());
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");

    Ok(())
}
