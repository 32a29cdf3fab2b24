use std::sync::{Arc, OnceLock};
use tracing::trace;

use super::manager::LastSeenManager;

pub static GLOBAL_LAST_SEEN_MANAGER: OnceLock<Arc<LastSeenManager>> = OnceLock::new();

/// Install the global last-seen manager (allowed exactly once).
pub fn set_global_last_seen_manager(manager: Arc<LastSeenManager>) {
    if GLOBAL_LAST_SEEN_MANAGER.set(manager).is_err() {
        panic!("GLOBAL_LAST_SEEN_MANAGER has already been set");
    }
}

/// Fetch the global last-seen manager.
pub fn get_last_seen_manager() -> Option<&'static Arc<LastSeenManager>> {
    match GLOBAL_LAST_SEEN_MANAGER.get() {
        Some(manager) => Some(manager),
        None => {
            trace!("GLOBAL_LAST_SEEN_MANAGER has not been initialized yet");
            None
        }
    }
}
