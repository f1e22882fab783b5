// src/integrations/mod.rs — Chat and spreadsheet integration layer

pub mod credentials;
pub mod discord;
pub mod google_sheets;
pub mod registry;
pub mod rocketchat;
pub mod types;
pub mod watcher;

pub use credentials::IntegrationCredentials;
pub use registry::IntegrationRegistry;
pub use types::{CellValue, IncomingMessage, Integration, MessagingAdapter, SpreadsheetAdapter};
pub use watcher::{WatchConfig, WatchEvent, WatcherManager};
