use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("🚀 Starting ETL process");

        // Extract
        tracing::info!("📥 Extracting data...");
        let records = self.pipeline.extract().await?;
        tracing::info!("📥 Extracted {} records", records.len());
        self.monitor.log_stats("Extract");

        // Transform
        tracing::info!("🔄 Transforming data...");
        let output = self.pipeline.transform(records).await?;
        tracing::info!("🔄 Transform complete");
        self.monitor.log_stats("Transform");

        // Load
        tracing::info!("💾 Loading data...");
        let output_path = self.pipeline.load(output).await?;
        tracing::info!("💾 Output saved to: {}", output_path);
        self.monitor.log_stats("Load");

        tracing::info!("✅ ETL process finished in {:?}", started.elapsed());
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EtlError;
    use async_trait::async_trait;

    struct CountingPipeline {
        records: Vec<u32>,
        fail_transform: bool,
    }

    #[async_trait]
    impl Pipeline for CountingPipeline {
        type Record = u32;
        type Output = usize;

        async fn extract(&self) -> Result<Vec<u32>> {
            Ok(self.records.clone())
        }

        async fn transform(&self, data: Vec<u32>) -> Result<usize> {
            if self.fail_transform {
                return Err(EtlError::ProcessingError {
                    message: "boom".to_string(),
                });
            }
            Ok(data.len())
        }

        async fn load(&self, output: usize) -> Result<String> {
            Ok(format!("loaded:{}", output))
        }
    }

    #[tokio::test]
    async fn test_engine_runs_all_phases_in_order() {
        let engine = EtlEngine::new(CountingPipeline {
            records: vec![1, 2, 3],
            fail_transform: false,
        });

        let output = engine.run().await.unwrap();
        assert_eq!(output, "loaded:3");
    }

    #[tokio::test]
    async fn test_engine_propagates_phase_errors() {
        let engine = EtlEngine::new(CountingPipeline {
            records: vec![1],
            fail_transform: true,
        });

        let err = engine.run().await.unwrap_err();
        assert!(matches!(err, EtlError::ProcessingError { .. }));
    }
}
