//! Engine lifecycle: the bootstrap seam and the once-only initialize/shutdown
//! state around it.
//!
//! # Example
//!
//! ```rust
//! use ki_cef_settings::bootstrap::{EngineRuntime, RecordingEngine};
//! use ki_cef_settings::settings::InitSettings;
//!
//! let mut runtime = EngineRuntime::new(RecordingEngine::new());
//! assert_eq!(runtime.is_initialized(), None);
//!
//! let ok = runtime.initialize(InitSettings::new(), ["app"]).unwrap();
//! assert!(ok);
//!
//! assert!(runtime.shutdown());
//! assert!(!runtime.shutdown());
//! ```

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::bootstrap::BootstrapPlan;
use crate::config::SettingsRecord;
use crate::native::NativeSettingsRecord;
use crate::settings::InitSettings;

/// Errors from the engine lifecycle.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Initialization was already attempted in this runtime.
    #[error("Engine initialization can only be attempted once")]
    AlreadyInitialized,

    /// The engine was shut down and cannot be started again.
    #[error("Engine has already been shut down")]
    AlreadyShutdown,

    /// The engine reported a failure.
    #[error("Engine error: {0}")]
    Engine(String),
}

/// The embedded engine's startup and teardown entry points.
pub trait EngineBootstrap {
    /// Starts the engine. `Ok(false)` means the engine declined to start.
    ///
    /// `native` is the holder's own record, still live for the duration of
    /// the call; `plan` carries the schemes and the launch command line.
    fn initialize(
        &mut self,
        plan: &BootstrapPlan,
        native: &NativeSettingsRecord,
    ) -> Result<bool, BootstrapError>;

    /// Stops the engine. Only called after a successful `initialize`.
    fn shutdown(&mut self);
}

/// In-memory engine that records every plan and native record it is given.
#[derive(Debug, Default)]
pub struct RecordingEngine {
    plans: Vec<BootstrapPlan>,
    natives: Vec<SettingsRecord>,
    refuse: bool,
    shutdown_calls: usize,
}

impl RecordingEngine {
    /// Engine that accepts every plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine that records plans but reports failure to start.
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Default::default()
        }
    }

    pub fn plans(&self) -> &[BootstrapPlan] {
        &self.plans
    }

    pub fn last_plan(&self) -> Option<&BootstrapPlan> {
        self.plans.last()
    }

    /// The native record of the last start, decoded.
    pub fn last_native(&self) -> Option<&SettingsRecord> {
        self.natives.last()
    }

    pub fn shutdown_calls(&self) -> usize {
        self.shutdown_calls
    }
}

impl EngineBootstrap for RecordingEngine {
    fn initialize(
        &mut self,
        plan: &BootstrapPlan,
        native: &NativeSettingsRecord,
    ) -> Result<bool, BootstrapError> {
        self.plans.push(plan.clone());
        self.natives.push(native.to_record());
        Ok(!self.refuse)
    }

    fn shutdown(&mut self) {
        self.shutdown_calls += 1;
    }
}

/// Tracks whether the engine has been initialized and shut down.
///
/// Initialization may be attempted once. Shutdown reaches the engine at most
/// once, and only after a successful initialization.
pub struct EngineRuntime<E: EngineBootstrap> {
    engine: E,
    initialized: Option<bool>,
    shutdown: bool,
    shutdown_listeners: Vec<Box<dyn FnOnce()>>,
}

impl<E: EngineBootstrap> EngineRuntime<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            initialized: None,
            shutdown: false,
            shutdown_listeners: Vec::new(),
        }
    }

    /// `None` before any attempt, otherwise whether initialization succeeded.
    pub fn is_initialized(&self) -> Option<bool> {
        self.initialized
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Starts the engine from `settings`, then disposes it.
    ///
    /// # Errors
    ///
    /// [`BootstrapError::AlreadyInitialized`] on a second attempt,
    /// [`BootstrapError::AlreadyShutdown`] after shutdown, or whatever the
    /// engine reports. `settings` is released in every case.
    pub fn initialize<I, S>(
        &mut self,
        mut settings: InitSettings,
        process_args: I,
    ) -> Result<bool, BootstrapError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.shutdown {
            return Err(BootstrapError::AlreadyShutdown);
        }
        if self.initialized.is_some() {
            return Err(BootstrapError::AlreadyInitialized);
        }

        let plan = BootstrapPlan::read(&settings, process_args);
        let result = self.engine.initialize(&plan, settings.native_record());
        settings.dispose();

        match result {
            Ok(started) => {
                self.initialized = Some(started);
                if started {
                    info!("engine initialized");
                } else {
                    warn!("engine declined to initialize");
                }
                Ok(started)
            }
            Err(e) => {
                self.initialized = Some(false);
                warn!("engine initialization failed: {}", e);
                Err(e)
            }
        }
    }

    /// Registers a callback run once, at the start of the first `shutdown` call.
    pub fn on_shutdown_started(&mut self, listener: impl FnOnce() + 'static) {
        self.shutdown_listeners.push(Box::new(listener));
    }

    /// Notifies listeners and stops the engine.
    ///
    /// Returns `true` only on the call that actually shut the engine down.
    /// Calls before a successful initialization or after shutdown are no-ops
    /// for the engine.
    pub fn shutdown(&mut self) -> bool {
        for listener in self.shutdown_listeners.drain(..) {
            listener();
        }

        if self.shutdown || self.initialized != Some(true) {
            debug!("shutdown ignored, engine not running");
            return false;
        }

        info!("shutting down engine");
        self.engine.shutdown();
        self.shutdown = true;
        true
    }
}
