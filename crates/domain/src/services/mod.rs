//! Domain services.

pub mod notifier;

pub use notifier::{ChannelNotifier, ExportNotice, ExportNotifier, LogNotifier, NoticeKind};
