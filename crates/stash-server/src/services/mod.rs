pub mod auth;
pub mod upload;

pub use auth::AuthService;
pub use upload::{UploadPolicy, UploadService};
