//! Domain models.

pub mod export_job;
pub mod request;
pub mod status;

pub use export_job::{DataType, ExportFormat, ExportJob, RawStatus, ResultFile};
pub use request::ExportRequest;
pub use status::UiStatus;
