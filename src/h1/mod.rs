//! HTTP/1.x request ingestion.
//!
//! [`RequestParser`] is the resumable request-line and header parser:
//! [`feed`] consumes octets and returns accept, reject, or need-more
//! through [`ParseResult`].
//!
//! [`RequestReader`] orchestrates one request per connection: it owns the
//! read buffer, drives the parser across partial socket reads, fills the
//! body from the `Content-Length` framing, decodes url-encoded payloads,
//! and invokes the user [`Handler`].
//!
//! [`feed`]: RequestParser::feed
//! [`ParseResult`]: crate::common::ParseResult
mod error;
mod parser;
mod reader;

pub use error::ParseError;
pub use parser::RequestParser;
pub use reader::{BODY_MAX, Handler, READ_BUFFER_SIZE, RequestReader, read_request};

#[cfg(test)]
mod test;
