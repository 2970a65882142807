//! Adapters for the store, the model and the HTTP surface.

pub mod completion;
pub mod http;
pub mod rest;
pub mod sqlite;
