//! PostgREST-style filters and parameterized CRUD over SQLite

pub mod app;
pub mod commands;
pub mod core;
pub mod data;
pub mod utils;
