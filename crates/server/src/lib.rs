//! Aster Boutique storefront API library.
//!
//! This crate provides the API server as a library, allowing it to be
//! tested in-process and reused by the CLI.
//!
//! # Architecture
//!
//! - Axum web framework, JSON request/response bodies
//! - A flat key-value store (`PostgreSQL` JSONB table, or in-memory for
//!   tests) holding products, orders, and invoices under key prefixes
//! - A hosted auth platform consumed over REST for accounts and sessions
//! - A best-effort email dispatcher notifying the shop admin of new orders

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod kv;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
