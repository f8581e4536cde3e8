//! Durable key-value storage scoped to the browser profile (localStorage on
//! web shells). The core uses a single key holding a JSON-encoded list of
//! selected place ids.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum StorageOperation {
    Read { key: String },
    Write { key: String, value: Vec<u8> },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum StorageOutput {
    /// Result of a `Read`; `None` when the key has never been written.
    Value(Option<Vec<u8>>),
    Written,
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage quota exceeded")]
    QuotaExceeded,
    #[error("storage unavailable: {reason}")]
    Unavailable { reason: String },
    #[error("storage I/O failed: {reason}")]
    Io { reason: String },
}

pub type StorageResult = Result<StorageOutput, StorageError>;

impl Operation for StorageOperation {
    type Output = StorageResult;
}

pub struct Storage<Ev> {
    context: CapabilityContext<StorageOperation, Ev>,
}

impl<Ev> Capability<Ev> for Storage<Ev> {
    type Operation = StorageOperation;
    type MappedSelf<MappedEv> = Storage<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        Storage::new(self.context.map_event(f))
    }
}

impl<Ev> Storage<Ev>
where
    Ev: 'static,
{
    #[must_use]
    pub fn new(context: CapabilityContext<StorageOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn read<F>(&self, key: impl Into<String>, make_event: F)
    where
        F: Fn(StorageResult) -> Ev + Send + Sync + 'static,
    {
        let key = key.into();
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx.request_from_shell(StorageOperation::Read { key }).await;
            ctx.update_app(make_event(result));
        });
    }

    pub fn write<F>(&self, key: impl Into<String>, value: Vec<u8>, make_event: F)
    where
        F: Fn(StorageResult) -> Ev + Send + Sync + 'static,
    {
        let key = key.into();
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx
                .request_from_shell(StorageOperation::Write { key, value })
                .await;
            ctx.update_app(make_event(result));
        });
    }
}
