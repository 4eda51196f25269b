mod object_content_store;
mod store_factory;

pub use object_content_store::ObjectContentStore;
pub use store_factory::ContentStoreFactory;
