//! adminui - a terminal admin table for member records.
//!
//! Loads a JSON member list once (over HTTP or from a file), then lets the
//! user search, page, select, bulk delete and edit rows in place. Changes
//! live in memory only.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod table;
pub mod tasks;
pub mod ui;
