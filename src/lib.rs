// Datachat - multi-format file preview pipeline with a simulated chat surface

pub mod chat;
pub mod config;
pub mod decode;
pub mod format;
pub mod pipeline;
pub mod preview;
pub mod types;
pub mod upload;

// Re-exports for convenience
pub use config::Config;
pub use format::{classify, SupportedFormat};
pub use pipeline::{preview_file, PreviewState, Previewer};
pub use preview::{PreviewLimits, PreviewResult};
pub use types::{PipelineError, PipelineResult};
pub use upload::gate::UploadGate;
pub use upload::UploadedFile;
