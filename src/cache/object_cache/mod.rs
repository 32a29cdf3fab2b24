pub mod moka;

pub use moka::MokaObjectCache;
