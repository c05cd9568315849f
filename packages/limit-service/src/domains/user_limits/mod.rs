//! User limit domain: entity model, validation, storage, domain service,
//! stream commands, and the batch consumer.

pub mod commands;
pub mod consumer;
pub mod data;
pub mod models;
pub mod service;
pub mod validate;
