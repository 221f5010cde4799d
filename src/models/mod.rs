// src/models/mod.rs

pub mod dream;
pub mod trend;
pub mod user;
