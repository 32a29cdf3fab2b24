pub mod composite;
pub mod existence_filter;
pub mod null_composite;
pub mod object_cache;
pub mod traits;

pub use composite::CompositeCache;
pub use null_composite::NullCompositeCache;
pub use traits::{CacheResult, CompositeCacheTrait, ExistenceFilter, ObjectCache};

use std::sync::Arc;
use std::time::Duration;

use crate::errors::{GotolinkError, Result};

/// Assemble the cache stack from the active configuration.
pub fn build_cache() -> Result<Arc<dyn CompositeCacheTrait>> {
    let config = crate::config::get_config();
    match config.cache.cache_type.as_str() {
        "none" => Ok(NullCompositeCache::arc()),
        "memory" => {
            let l1 = Arc::new(existence_filter::BloomExistenceFilter::new()?);
            let l2 = Arc::new(object_cache::MokaObjectCache::new(
                config.cache.memory.max_capacity,
                Duration::from_secs(config.cache.default_ttl),
            ));
            Ok(Arc::new(CompositeCache::new(l1, l2)))
        }
        other => Err(GotolinkError::cache_init(format!(
            "Unknown cache type: {other}"
        ))),
    }
}
