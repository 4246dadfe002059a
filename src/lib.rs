pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod router;
pub mod store;

pub use api::ApiClient;
pub use app::AdminApp;
pub use error::{ApiError, ApiResult};
pub use store::{SessionState, SessionStore};
