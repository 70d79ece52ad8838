//! Client side of the remote array store.
//!
//! The store exposes create, read, update, delete, list, and sort calls over
//! HTTP. Everything above this crate talks to it through the
//! [`RemoteArrayGateway`] trait, which has two implementations:
//!
//! - [`HttpGateway`] - the real store, reached with `reqwest`
//! - [`MemoryGateway`] - an in-process store with a call log and failure
//!   injection, used by tests and offline runs
//!
//! # Endpoints
//!
//! | Call | Request | Success |
//! |------|---------|---------|
//! | list | `GET /arrays/?page={n}` | `200 {count, results}` |
//! | read | `GET /arrays/{id}/` | `200 ArrayRecord` or `404` |
//! | create | `POST /arrays/` | `201 ArrayRecord` |
//! | update | `PUT /arrays/{id}/` | `200` |
//! | delete | `DELETE /arrays/{id}/` | `204` |
//! | sort | `POST /sort/` | `200 {data, execution_time}` |

#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod memory;

pub use config::ClientConfig;
pub use error::{GENERIC_FAILURE_MESSAGE, GatewayError, Result};
pub use gateway::RemoteArrayGateway;
pub use http::HttpGateway;
pub use memory::{GatewayCall, MemoryGateway, Operation};
