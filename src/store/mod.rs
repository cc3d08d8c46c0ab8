use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::models::{ProcurementRequest, QueueItem, QueueStatus};

/// Terminal queue entries beyond this are pruned oldest-first; in-flight
/// entries are never pruned.
const QUEUE_CAP: usize = 50;

#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    pub requests: Vec<ProcurementRequest>,
    pub queue: Vec<QueueItem>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

type Subscriber = Box<dyn Fn(&StoreSnapshot) + Send + Sync>;

/// Single-writer observable state container. Every mutation synchronously
/// notifies all subscribers with the new snapshot.
pub struct Store {
    state: Mutex<StoreSnapshot>,
    subscribers: Mutex<Vec<Subscriber>>,
}

impl Default for Store {
    fn default() -> Self {
        Store::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Store {
            state: Mutex::new(StoreSnapshot::default()),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn subscribe<F>(&self, subscriber: F)
    where
        F: Fn(&StoreSnapshot) + Send + Sync + 'static,
    {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(subscriber));
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.state_guard().clone()
    }

    /// Full replace with the server's latest list. Never merged or patched.
    pub fn set_requests(&self, requests: Vec<ProcurementRequest>) {
        self.state_guard().requests = requests;
        self.publish();
    }

    pub fn add_to_queue(&self, item: QueueItem) {
        {
            let mut state = self.state_guard();
            state.queue.push(item);
            prune_terminal(&mut state.queue);
        }
        self.publish();
    }

    /// In-place status replace; silent no-op when the id is unknown.
    pub fn update_queue(&self, id: &str, status: QueueStatus) {
        {
            let mut state = self.state_guard();
            if let Some(item) = state.queue.iter_mut().find(|item| item.id == id) {
                item.status = status;
            }
        }
        self.publish();
    }

    pub fn set_success_message(&self, message: Option<String>) {
        self.state_guard().success_message = message;
        self.publish();
    }

    pub fn set_error_message(&self, message: Option<String>) {
        self.state_guard().error_message = message;
        self.publish();
    }

    pub fn clear_messages(&self) {
        {
            let mut state = self.state_guard();
            state.success_message = None;
            state.error_message = None;
        }
        self.publish();
    }

    fn state_guard(&self) -> MutexGuard<'_, StoreSnapshot> {
        // A poisoned lock still holds the last consistent snapshot.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self) {
        let snapshot = self.snapshot();
        let subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for subscriber in subscribers.iter() {
            subscriber(&snapshot);
        }
    }
}

fn prune_terminal(queue: &mut Vec<QueueItem>) {
    while queue.len() > QUEUE_CAP {
        let Some(pos) = queue.iter().position(|item| item.status.is_terminal()) else {
            break;
        };
        queue.remove(pos);
    }
}
