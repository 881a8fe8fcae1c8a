use crate::domain::model::PrerequisiteTable;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn courses_file(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_file(&self) -> &str;
    fn related_limit(&self) -> usize;
    fn prerequisites(&self) -> &PrerequisiteTable;
    fn pretty_output(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    type Record: Send + 'static;
    type Output: Send + 'static;

    async fn extract(&self) -> Result<Vec<Self::Record>>;
    async fn transform(&self, data: Vec<Self::Record>) -> Result<Self::Output>;
    async fn load(&self, output: Self::Output) -> Result<String>;
}
