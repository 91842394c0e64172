//src/model/mod.rs
pub mod electron_config;
pub mod elements;

// Re-exports for cleaner imports
pub use elements::{find_element, Block, Category, Compound, Element, MatterState, Property, Series};
