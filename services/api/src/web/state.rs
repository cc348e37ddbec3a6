//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use std::sync::Arc;
use typing_core::ports::TextStore;

/// The shared application state, created once at startup and passed to all
/// handlers. Handlers only see the store through the `TextStore` port.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TextStore>,
    pub config: Arc<Config>,
}
