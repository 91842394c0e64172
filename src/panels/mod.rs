// src/panels/mod.rs
pub mod sidebar;
