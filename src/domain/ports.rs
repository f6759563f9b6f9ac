use std::future::Future;

use super::errors::{StorageError, SubmissionError};
use super::order::{Order, SubmissionReceipt};

/// String-keyed persistent slots, the shape of browser local storage.
pub trait KeyValueStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

pub trait IdGenerator: Send + Sync + 'static {
    fn next_id(&self) -> String;
}

impl<T: IdGenerator + ?Sized> IdGenerator for Box<T> {
    fn next_id(&self) -> String {
        (**self).next_id()
    }
}

/// Where orders go once built. Implementations perform no deduplication by
/// order id; callers must not resubmit while a call is pending.
pub trait SubmissionBackend: Send + Sync + 'static {
    fn submit(
        &self,
        order: &Order,
    ) -> impl Future<Output = Result<SubmissionReceipt, SubmissionError>> + Send;
}
