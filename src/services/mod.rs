// Service exports
pub mod appwrite;
pub mod cache;
pub mod identity;
pub mod postgres;

pub use appwrite::{AppwriteClient, AppwriteCollections, AppwriteError};
pub use cache::{CacheManager, CacheKey, CacheError};
pub use identity::{IdentityVerifier, IdentityError, Claims};
pub use postgres::{PostgresClient, PostgresError};
