// src/handlers/mod.rs

pub mod auth;
pub mod docs;
pub mod dreams;
pub mod trends;
