//! Task Lists API Library
//!
//! A session-authenticated REST API for personal task lists and tasks,
//! backed by MongoDB for records and Redis for sessions.

pub mod api;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod service;
