//! Client core for the Sodam commercial-district diagnosis API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). A native host can execute
//! the round-trip itself through the `sodam-ffi` crate; Rust callers can let
//! `SodamApi` drive a `Transport` (the `blocking` feature provides one on
//! top of ureq).
//!
//! # Design
//! - `SodamClient` is stateless: base URL and User-Agent only.
//! - Every operation is a `build_*` method plus one generic
//!   `parse::<R>()`, so the I/O boundary is explicit.
//! - `SessionStore` is the only mutable shared state. The host creates it
//!   once and passes it by reference.
//! - DTOs are defined independently from the mock-server crate; the
//!   integration tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod market;
pub mod session;
pub mod transport;
pub mod types;
pub mod validation;

pub use api::SodamApi;
pub use client::SodamClient;
pub use config::ClientConfig;
pub use endpoint::Endpoint;
pub use error::{ApiError, ValidationError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use market::{Category, MarketCode};
pub use session::{SessionState, SessionStore, SubscriptionId};
pub use transport::Transport;
#[cfg(feature = "blocking")]
pub use transport::UreqTransport;
pub use types::{AuthResponse, Envelope, GenericResponse, LoginRequest, RegisterRequest, User};

