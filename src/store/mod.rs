pub mod document;
pub mod provider;
pub mod providers;

pub use document::{AyahDocument, PageDocument};
pub use provider::{PageSink, PageStore, StoreError};
pub use providers::{DemoPageStore, HttpPageStore};
