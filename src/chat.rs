// Conversational surface collaborator

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::upload::UploadedFile;

/// Answers free-text questions about an accepted file. The preview pipeline
/// never goes through here; the backend only ever sees the file reference
/// and the query, so a real service can replace the stub without touching
/// the pipeline.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn ask(&self, file: &UploadedFile, query: &str) -> Result<String>;
}

/// Stand-in backend: waits a fixed artificial delay, then returns a canned
/// acknowledgment referencing the query and file name. No network call.
pub struct SimulatedBackend {
    delay: Duration,
}

impl SimulatedBackend {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000))
    }
}

#[async_trait]
impl ChatBackend for SimulatedBackend {
    async fn ask(&self, file: &UploadedFile, query: &str) -> Result<String> {
        debug!("simulating a reply about {} in {:?}", file.name(), self.delay);
        tokio::time::sleep(self.delay).await;
        Ok(format!(
            "Okay, I'm looking into \"{query}\" for the file: {}. (This is a simulated response)",
            file.name()
        ))
    }
}
