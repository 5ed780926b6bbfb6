#![deny(missing_docs, missing_debug_implementations)]

//! Request/response over AMQP 1.0 with `fe2o3-amqp`
//!
//! The [`client::Client`] sends one request at a time to a fixed node and waits for the reply
//! on a receiver whose source address is assigned dynamically by the peer. The client itself is
//! a plain state machine driven by [`client::Event`]s; [`driver::run`] feeds it events from an
//! [`endpoint::Endpoint`] and performs the [`client::Action`]s it returns.
//!
//! The [`server`] module contains the matching responder, which replies to each request with
//! its body in upper case.

pub mod address;
pub mod cli;
pub mod client;
pub mod driver;
pub mod endpoint;
pub mod error;
pub mod logging;
pub mod server;

pub use address::Address;
pub use client::Client;
pub use driver::run;
pub use endpoint::{AmqpEndpoint, Endpoint};
pub use error::Error;

/// The address used when none is given on the command line
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:5672/examples";

/// Requests sent by the client when none are given on the command line
pub const DEFAULT_REQUESTS: [&str; 4] = [
    "Twas brillig, and the slithy toves",
    "Did gire and gymble in the wabe.",
    "All mimsy were the borogroves,",
    "And the mome raths outgrabe.",
];
