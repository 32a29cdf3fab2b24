pub mod cleanup;
pub mod short_url_service;

pub use cleanup::{CleanupReport, StaleUrlCleaner};
pub use short_url_service::{CreateShortUrlRequest, ShortUrlService};
