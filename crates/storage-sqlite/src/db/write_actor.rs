//! Single-writer actor for SQLite.
//!
//! SQLite allows one writer at a time; instead of letting pool connections
//! contend on the write lock, all writes are funneled through one background
//! task that owns a dedicated connection and runs each job inside an
//! immediate transaction. The compare-and-swap repositories rely on this:
//! their read-check-write happens atomically within that transaction.

use std::any::Any;
use std::sync::Arc;

use diesel::SqliteConnection;
use tokio::sync::{mpsc, oneshot};

use pistosi_core::errors::{Error, Result};

use super::DbPool;
use crate::errors::StorageError;

// A write job: runs against the writer's connection, result type-erased so
// one channel carries jobs of any return type.
type Job = Box<dyn FnOnce(&mut SqliteConnection) -> Result<Box<dyn Any + Send + 'static>> + Send + 'static>;
type Reply = oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>;

/// Handle for submitting jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<(Job, Reply)>,
}

impl WriteHandle {
    /// Execute a database job on the writer's dedicated connection, inside
    /// an immediate transaction.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |conn| job(conn).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .map_err(|_| Error::Unexpected("Database writer actor has stopped".to_string()))?;

        let boxed = ret_rx
            .await
            .map_err(|_| Error::Unexpected("Database writer dropped the reply".to_string()))??;

        boxed
            .downcast::<T>()
            .map(|v| *v)
            .map_err(|_| Error::Unexpected("Writer job returned an unexpected type".to_string()))
    }
}

/// Spawn the background writer task. It holds one connection from the pool
/// for its whole lifetime and processes write jobs serially; the actor
/// terminates once every `WriteHandle` is dropped.
pub fn spawn_writer(pool: Arc<DbPool>) -> Result<WriteHandle> {
    let (tx, mut rx) = mpsc::channel::<(Job, Reply)>(1024);

    let mut conn = pool
        .get()
        .map_err(|e| Error::Unexpected(format!("No connection for writer actor: {e}")))?;

    tokio::spawn(async move {
        while let Some((job, reply_tx)) = rx.recv().await {
            // StorageError implements From<diesel::result::Error>, which the
            // transaction wrapper needs; convert back at the boundary.
            let result: Result<Box<dyn Any + Send + 'static>> = conn
                .immediate_transaction::<_, StorageError, _>(|tx_conn| {
                    job(tx_conn).map_err(StorageError::from)
                })
                .map_err(|e: StorageError| e.into());

            // The receiver may have been dropped (request cancelled); the
            // transaction already committed or rolled back either way.
            let _ = reply_tx.send(result);
        }
    });

    Ok(WriteHandle { tx })
}
