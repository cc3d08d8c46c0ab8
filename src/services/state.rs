use std::collections::HashSet;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tracing::debug;

use crate::api::{ApiError, ProcurementApi};
use crate::commands::requests::RequestForm;
use crate::models::{CommodityGroup, Settings};
use crate::services::debounce::DelayedTask;
use crate::store::Store;

const SUCCESS_NOTICE_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    NewRequest,
    Analytics,
    Settings,
}

/// Shared client state: API handle, observable store, session caches and
/// the timer handles behind the debounced flows.
pub struct AppState {
    pub api: Arc<dyn ProcurementApi>,
    pub store: Arc<Store>,
    pub settings: Settings,
    form: Mutex<RequestForm>,
    active_tab: Mutex<Tab>,
    commodity_groups: Mutex<Vec<CommodityGroup>>,
    predict_task: DelayedTask,
    predict_gen: AtomicU64,
    tab_task: DelayedTask,
    notice_task: DelayedTask,
    in_flight: Mutex<HashSet<&'static str>>,
    alive: AtomicBool,
    weak: Weak<AppState>,
}

impl AppState {
    pub fn new(
        api: Arc<dyn ProcurementApi>,
        store: Arc<Store>,
        settings: Settings,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak| AppState {
            api,
            store,
            settings,
            form: Mutex::new(RequestForm::default()),
            active_tab: Mutex::new(Tab::Overview),
            commodity_groups: Mutex::new(Vec::new()),
            predict_task: DelayedTask::new(),
            predict_gen: AtomicU64::new(0),
            tab_task: DelayedTask::new(),
            notice_task: DelayedTask::new(),
            in_flight: Mutex::new(HashSet::new()),
            alive: AtomicBool::new(true),
            weak: weak.clone(),
        })
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Teardown: pending timers are cancelled and any still-resolving
    /// network call is barred from touching the store.
    pub fn shutdown(&self) {
        self.alive.store(false, Ordering::SeqCst);
        self.predict_task.cancel();
        self.tab_task.cancel();
        self.notice_task.cancel();
    }

    pub fn form(&self) -> MutexGuard<'_, RequestForm> {
        self.form.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn active_tab(&self) -> Tab {
        *self
            .active_tab
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_active_tab(&self, tab: Tab) {
        *self
            .active_tab
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = tab;
    }

    pub fn schedule_tab_switch(&self, delay: Duration, tab: Tab) {
        let Some(state) = self.weak.upgrade() else {
            return;
        };
        self.tab_task.schedule(delay, async move {
            if state.is_alive() {
                state.set_active_tab(tab);
            }
        });
    }

    pub fn cancel_tab_switch(&self) {
        self.tab_task.cancel();
    }

    pub fn schedule_prediction<F>(&self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.predict_task.schedule(delay, task);
    }

    /// Bumps the prediction generation and returns the new value. A reply
    /// may only be applied while its generation is still current.
    pub fn next_predict_generation(&self) -> u64 {
        self.predict_gen.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current_predict_generation(&self) -> u64 {
        self.predict_gen.load(Ordering::SeqCst)
    }

    /// Success notices auto-clear; a newer notice reschedules the timer.
    pub fn set_transient_success(&self, message: String) {
        self.store.set_success_message(Some(message));
        let Some(state) = self.weak.upgrade() else {
            return;
        };
        self.notice_task.schedule(SUCCESS_NOTICE_TTL, async move {
            if state.is_alive() {
                state.store.set_success_message(None);
            }
        });
    }

    /// Per-action duplicate-submission gate. Returns None while the same
    /// action is still outstanding.
    pub fn begin_action(&self, name: &'static str) -> Option<ActionGuard<'_>> {
        let mut guard = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !guard.insert(name) {
            debug!(action = name, "action already in flight");
            return None;
        }
        Some(ActionGuard { state: self, name })
    }

    /// Re-fetch the full list and replace store state with the server's
    /// snapshot. Skipped when the client has been torn down.
    pub async fn refresh_requests(&self) -> Result<(), ApiError> {
        let requests = self.api.list_requests().await?;
        if self.is_alive() {
            self.store.set_requests(requests);
        }
        Ok(())
    }

    /// Reference data, fetched once per session.
    pub async fn load_commodity_groups(&self) -> Result<(), ApiError> {
        {
            let cached = self
                .commodity_groups
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if !cached.is_empty() {
                return Ok(());
            }
        }
        let groups = self.api.list_commodity_groups().await?;
        if self.is_alive() {
            *self
                .commodity_groups
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = groups;
        }
        Ok(())
    }

    pub fn commodity_groups(&self) -> Vec<CommodityGroup> {
        self.commodity_groups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

pub struct ActionGuard<'a> {
    state: &'a AppState,
    name: &'static str,
}

impl Drop for ActionGuard<'_> {
    fn drop(&mut self) {
        self.state
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(self.name);
    }
}
