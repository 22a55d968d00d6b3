//! Client state store.
//!
//! One owned [`StoreState`] behind a mutex, changed only through
//! [`Mutation`]s. Actions in [`actions`] orchestrate backend calls and commit
//! mutations with the results.

pub mod actions;
pub mod getters;
pub mod mutations;
pub mod state;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use actions::{ActionOutcome, PowerAction};
pub use mutations::{apply, set_instance_state_status, Mutation};
pub use state::StoreState;

#[derive(Clone, Debug, Default)]
pub struct Store {
    inner: Arc<Mutex<StoreState>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: StoreState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        // Mutations never panic half-way, so a poisoned state is still consistent.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn commit(&self, mutation: Mutation) {
        let mut guard = self.lock();
        let current = std::mem::take(&mut *guard);
        *guard = apply(current, mutation);
    }

    pub fn snapshot(&self) -> StoreState {
        self.lock().clone()
    }

    pub fn read<R>(&self, f: impl FnOnce(&StoreState) -> R) -> R {
        f(&self.lock())
    }

    /// Marks the full list fetch as in flight, unless it already is.
    pub fn begin_app_loading(&self) -> Option<LoadingGuard> {
        self.begin(LoadingTarget::App)
    }

    pub fn begin_environment_loading(&self, id: &str) -> Option<LoadingGuard> {
        self.begin(LoadingTarget::Environment(id.to_string()))
    }

    pub fn begin_instance_loading(&self, id: &str) -> Option<LoadingGuard> {
        self.begin(LoadingTarget::Instance(id.to_string()))
    }

    // Check and set happen under one lock so two callers cannot both win.
    fn begin(&self, target: LoadingTarget) -> Option<LoadingGuard> {
        let mut guard = self.lock();
        let busy = match &target {
            LoadingTarget::App => guard.is_app_loading(),
            LoadingTarget::Environment(id) => guard.is_environment_loading(id),
            LoadingTarget::Instance(id) => guard.is_instance_loading(id),
        };
        if busy {
            return None;
        }
        let current = std::mem::take(&mut *guard);
        *guard = apply(current, target.mutation(true));
        drop(guard);
        Some(LoadingGuard {
            store: self.clone(),
            target,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadingTarget {
    App,
    Environment(String),
    Instance(String),
}

impl LoadingTarget {
    fn mutation(&self, flag: bool) -> Mutation {
        match self {
            LoadingTarget::App => Mutation::SetIsLoading(flag),
            LoadingTarget::Environment(id) => Mutation::SetEnvironmentLoading { id: id.clone(), flag },
            LoadingTarget::Instance(id) => Mutation::SetInstanceLoading { id: id.clone(), flag },
        }
    }
}

/// Clears its loading flag when dropped, whichever way the owning action ends.
#[derive(Debug)]
pub struct LoadingGuard {
    store: Store,
    target: LoadingTarget,
}

impl LoadingGuard {
    pub fn target(&self) -> &LoadingTarget {
        &self.target
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.store.commit(self.target.mutation(false));
    }
}
