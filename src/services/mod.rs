// Service exports
pub mod cache;
pub mod document_store;
pub mod memory;
pub mod sessions;
pub mod store;

pub use cache::{CacheError, CacheKey, RecommendationCache};
pub use document_store::{DocumentCollections, DocumentStoreClient, DocumentStoreError};
pub use memory::InMemoryStore;
pub use sessions::{PostgresSessionHistory, SessionStoreError};
pub use store::{MentorDirectory, MentorFilter, ParticipantDirectory, SessionHistory, StoreError};
