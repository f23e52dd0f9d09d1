/// Request head parsing error.
///
/// Any variant invalidates the request; the connection itself is left for
/// the handler to deal with.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Invalid character in the method token.
    #[error("invalid character in method")]
    InvalidMethod,
    #[error("method too long")]
    MethodTooLong,
    /// Control character in the request target.
    #[error("invalid character in request target")]
    InvalidTarget,
    #[error("request target too long")]
    TargetTooLong,
    /// Control character in the query string.
    #[error("invalid character in query string")]
    InvalidQuery,
    #[error("query string too long")]
    QueryTooLong,
    /// The version did not match `HTTP/<digits>.<digits>`.
    #[error("malformed http version")]
    InvalidVersion,
    /// Invalid character in a header name, or where one was expected.
    #[error("invalid character in header name")]
    InvalidHeaderName,
    #[error("header name too long")]
    HeaderNameTooLong,
    /// Invalid character in a header value.
    #[error("invalid character in header value")]
    InvalidHeaderValue,
    #[error("header value too long")]
    HeaderValueTooLong,
    /// The `Content-Length` header declared more than [`BODY_MAX`] octets.
    ///
    /// [`BODY_MAX`]: super::BODY_MAX
    #[error("request body too large")]
    BodyTooLarge,
}

impl ParseError {
    /// Returns `true` when the reject came from a size ceiling rather than
    /// the grammar.
    pub fn is_limit(&self) -> bool {
        matches!(
            self,
            Self::MethodTooLong
                | Self::TargetTooLong
                | Self::QueryTooLong
                | Self::HeaderNameTooLong
                | Self::HeaderValueTooLong
                | Self::BodyTooLarge
        )
    }
}
