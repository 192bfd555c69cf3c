//! API module - HTTP routes, handlers, form extraction, and models

pub mod form;
pub mod handlers;
pub mod models;
pub mod routes;
