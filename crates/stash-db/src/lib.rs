pub mod error;
pub mod memory;
pub mod pool;
pub mod repos;
pub mod traits;

// Re-export commonly used items
pub use error::DirectoryError;
pub use memory::{MemoryFileCatalog, MemoryUserDirectory};
pub use pool::{create_pool, run_migrations};
pub use repos::file::{FileRepo, FileRow};
pub use repos::user::{UserRepo, UserRow};
pub use traits::{FileCatalog, PgFileCatalog, PgUserDirectory, UserDirectory};
