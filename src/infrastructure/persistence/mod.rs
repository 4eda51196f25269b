mod pg_pool;
mod repositories;

pub use repositories::InMemoryMetadataStore;
pub use repositories::PgMetadataStore;

pub use pg_pool::{create_pool, run_migrations};
