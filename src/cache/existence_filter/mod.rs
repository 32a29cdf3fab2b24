pub mod bloom;

pub use bloom::BloomExistenceFilter;
