//! Request ingestion core for lightweight embeddable HTTP/1.x servers.
//!
//! The crate reads one request from a client connection: the request line
//! and headers through a resumable byte-at-a-time state machine with strict
//! per-field size ceilings, then the body framed by `Content-Length`, then
//! URL-encoded payload decoding. The materialized [`Request`] is handed to a
//! user [`Handler`] whether parsing succeeded or not; [`Request::is_valid`]
//! distinguishes the outcomes.
//!
//! # Quick Start
//!
//! ```ignore
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let tcp = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!
//!     loop {
//!         let (stream, _) = tcp.accept().await?;
//!         tokio::spawn(prow::read_request(stream, |request: prow::Request, _conn| {
//!             println!("{} {:?}", request.method(), request.resource());
//!         }));
//!     }
//! }
//! ```
#![warn(missing_debug_implementations)]

mod bytestring;
mod common;

pub mod matches;

pub mod form;
pub mod h1;
pub mod headers;
pub mod io;
pub mod request;

// ===== Reexports =====

pub use bytestring::ByteStr;
pub use common::ParseResult;
pub use form::Params;
pub use h1::{Handler, ParseError, RequestParser, RequestReader, read_request};
pub use headers::HeaderMap;
pub use io::Io;
pub use request::Request;
