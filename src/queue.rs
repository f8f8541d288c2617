//! Distribution queues between the crawler and the indexer workers
//!
//! A queue is a FIFO channel with any number of producers and consumers.
//! Without a capacity it is unbounded: producers never wait, so a slow
//! worker pool cannot stall the crawler. With a capacity, producers wait
//! for free space instead.
//!
//! The queue closes once every sender is dropped; receivers then drain the
//! remaining items and get `None`.

use crate::IndexError;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// Creates a queue, bounded iff `capacity` is given
pub fn work_queue<T>(name: &'static str, capacity: Option<usize>) -> (QueueSender<T>, QueueReceiver<T>) {
    let (sender, receiver) = match capacity {
        Some(capacity) => {
            let (tx, rx) = mpsc::channel(capacity.max(1));
            (Sender::Bounded(tx), Receiver::Bounded(rx))
        }
        None => {
            let (tx, rx) = mpsc::unbounded_channel();
            (Sender::Unbounded(tx), Receiver::Unbounded(rx))
        }
    };

    (
        QueueSender { name, inner: sender },
        QueueReceiver {
            name,
            inner: Arc::new(Mutex::new(receiver)),
        },
    )
}

enum Sender<T> {
    Bounded(mpsc::Sender<T>),
    Unbounded(mpsc::UnboundedSender<T>),
}

enum Receiver<T> {
    Bounded(mpsc::Receiver<T>),
    Unbounded(mpsc::UnboundedReceiver<T>),
}

/// Producer side of a work queue
pub struct QueueSender<T> {
    name: &'static str,
    inner: Sender<T>,
}

impl<T> Clone for QueueSender<T> {
    fn clone(&self) -> Self {
        let inner = match &self.inner {
            Sender::Bounded(tx) => Sender::Bounded(tx.clone()),
            Sender::Unbounded(tx) => Sender::Unbounded(tx.clone()),
        };
        Self {
            name: self.name,
            inner,
        }
    }
}

impl<T> QueueSender<T> {
    /// Pushes an item, waiting for space only on a bounded queue
    ///
    /// Fails once every receiver has been dropped.
    pub async fn send(&self, item: T) -> Result<(), IndexError> {
        let sent = match &self.inner {
            Sender::Bounded(tx) => tx.send(item).await.is_ok(),
            Sender::Unbounded(tx) => tx.send(item).is_ok(),
        };
        if sent {
            Ok(())
        } else {
            Err(IndexError::QueueClosed(self.name))
        }
    }

    /// Name of the queue, for logging
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Consumer side of a work queue, shareable between workers
pub struct QueueReceiver<T> {
    name: &'static str,
    inner: Arc<Mutex<Receiver<T>>>,
}

impl<T> Clone for QueueReceiver<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> QueueReceiver<T> {
    /// Takes the next item, waiting while the queue is empty
    ///
    /// Returns `None` once the queue is closed and drained.
    pub async fn recv(&self) -> Option<T> {
        let mut receiver = self.inner.lock().await;
        match &mut *receiver {
            Receiver::Bounded(rx) => rx.recv().await,
            Receiver::Unbounded(rx) => rx.recv().await,
        }
    }

    /// Name of the queue, for logging
    pub fn name(&self) -> &'static str {
        self.name
    }
}
