use crate::domain::model::ErrorRow;
use crate::utils::error::SinkError;
use async_trait::async_trait;

/// Destination for the rows a parse rejected. Called once per parse with the
/// whole batch; an empty batch must succeed without side effects.
#[async_trait]
pub trait ErrorSink: Send + Sync {
    async fn write_rows(&self, rows: &[ErrorRow]) -> Result<(), SinkError>;
}
