pub mod antibot;
pub mod core;
pub mod server;
pub mod tools;

// --- Primary core exports ---
pub use self::core::config;
pub use self::core::error::SearchError;
pub use self::core::types;
pub use self::core::types::*;
pub use self::core::AppState;

pub use tools::search;
pub use tools::search::{SearchOrchestrator, SearchService};
