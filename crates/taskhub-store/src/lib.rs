#![allow(clippy::must_use_candidate)]

//! Client for the hosted Postgres/auth service
//!
//! The data store is an external collaborator reached over its REST API:
//! auth endpoints for sessions and token verification, PostgREST for task
//! rows. Everything here returns rows or a typed [`StoreError`]; mapping
//! into the client-visible error taxonomy lives in `error.rs`.

mod auth;
mod client;
mod error;
mod tasks;

pub use auth::Session;
pub use client::Store;
pub use error::StoreError;
pub use tasks::{NewTask, Task, TaskPatch, TaskPriority, TaskStatus};
