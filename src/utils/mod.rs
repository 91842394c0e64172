// src/utils/mod.rs
pub mod logger;
pub mod report;
