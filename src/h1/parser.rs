use bytes::{BufMut, BytesMut};

use super::error::ParseError;
use crate::bytestring::ByteStr;
use crate::common::ParseResult;
use crate::matches;
use crate::request::Request;

macro_rules! err {
    ($variant:ident) => {
        ParseResult::Err(ParseError::$variant)
    };
}

/// Resumable byte-at-a-time parser for the request line and header block.
///
/// State persists across [`feed`] calls, so the head may span any number
/// of partial reads; committed fields are written straight into the
/// [`Request`] passed to each call. Line termination is permissive: CRLF,
/// LFCR, bare CR and bare LF are all accepted, and a doubled CR or LF
/// where a line boundary is expected ends the head.
///
/// Size ceilings are checked before appending, so a reject is prompt and
/// scratch never grows past its cap.
///
/// [`feed`]: RequestParser::feed
#[derive(Debug)]
pub struct RequestParser {
    state: State,
    method: BytesMut,
    resource: BytesMut,
    query: BytesMut,
    header_name: BytesMut,
    header_value: BytesMut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    MethodStart,
    Method,
    UriStem,
    UriQuery,
    VersionH,
    VersionT1,
    VersionT2,
    VersionP,
    VersionSlash,
    VersionMajorStart,
    VersionMajor,
    VersionMinorStart,
    VersionMinor,
    /// Line ended with CR, LF expected.
    ExpectingLf,
    /// Line ended with a bare LF, CR expected.
    ExpectingCr,
    HeaderStart,
    HeaderWhitespace,
    HeaderName,
    SpaceBeforeHeaderValue,
    HeaderValue,
    ExpectingFinalLf,
    ExpectingFinalCr,
}

impl RequestParser {
    /// Largest accepted method token.
    pub const METHOD_MAX: usize = 1024;

    /// Largest accepted request target stem.
    pub const RESOURCE_MAX: usize = 256 * 1024;

    /// Largest accepted query string.
    pub const QUERY_STRING_MAX: usize = 1024 * 1024;

    /// Largest accepted header name.
    pub const HEADER_NAME_MAX: usize = 1024;

    /// Largest accepted header value.
    pub const HEADER_VALUE_MAX: usize = 1024 * 1024;

    /// Create a parser at the start of a request.
    pub fn new() -> Self {
        Self {
            state: State::MethodStart,
            method: BytesMut::new(),
            resource: BytesMut::new(),
            query: BytesMut::new(),
            header_name: BytesMut::new(),
            header_value: BytesMut::new(),
        }
    }

    /// Rearm the parser for the next request.
    pub fn reset(&mut self) {
        self.state = State::MethodStart;
        self.method.clear();
        self.resource.clear();
        self.query.clear();
        self.header_name.clear();
        self.header_value.clear();
    }

    /// Consume octets from `bytes`, committing completed fields into `request`.
    ///
    /// `Ok(consumed)` means the head terminator was consumed and
    /// `bytes[consumed..]` belongs to the body. `Err` means a grammar or
    /// ceiling violation; the request must be treated as invalid. `Pending`
    /// means every octet was consumed and more input is required.
    pub fn feed(&mut self, bytes: &[u8], request: &mut Request) -> ParseResult<usize, ParseError> {
        let mut i = 0;

        while let Some(&byte) = bytes.get(i) {
            match self.state {
                State::MethodStart => {
                    if !matches::is_token(byte) {
                        return err!(InvalidMethod);
                    }
                    self.method.clear();
                    self.method.put_u8(byte);
                    self.state = State::Method;
                }

                State::Method => {
                    if byte == b' ' {
                        request.set_method(self.commit_method());
                        self.resource.clear();
                        self.state = State::UriStem;
                    } else if !matches::is_token(byte) {
                        return err!(InvalidMethod);
                    } else if self.method.len() >= Self::METHOD_MAX {
                        return err!(MethodTooLong);
                    } else {
                        self.method.put_u8(byte);
                    }
                }

                State::UriStem => {
                    if byte == b' ' {
                        request.set_resource(self.resource.split().freeze());
                        self.state = State::VersionH;
                    } else if byte == b'?' {
                        request.set_resource(self.resource.split().freeze());
                        self.query.clear();
                        self.state = State::UriQuery;
                    } else if matches::is_control(byte) {
                        return err!(InvalidTarget);
                    } else if self.resource.len() >= Self::RESOURCE_MAX {
                        return err!(TargetTooLong);
                    } else {
                        self.resource.put_u8(byte);
                    }
                }

                State::UriQuery => {
                    if byte == b' ' {
                        request.set_query_string(self.query.split().freeze());
                        self.state = State::VersionH;
                    } else if matches::is_control(byte) {
                        return err!(InvalidQuery);
                    } else if self.query.len() >= Self::QUERY_STRING_MAX {
                        return err!(QueryTooLong);
                    } else {
                        self.query.put_u8(byte);
                    }
                }

                // strict literal match of "HTTP/"
                State::VersionH => {
                    if byte != b'H' {
                        return err!(InvalidVersion);
                    }
                    self.state = State::VersionT1;
                }
                State::VersionT1 => {
                    if byte != b'T' {
                        return err!(InvalidVersion);
                    }
                    self.state = State::VersionT2;
                }
                State::VersionT2 => {
                    if byte != b'T' {
                        return err!(InvalidVersion);
                    }
                    self.state = State::VersionP;
                }
                State::VersionP => {
                    if byte != b'P' {
                        return err!(InvalidVersion);
                    }
                    self.state = State::VersionSlash;
                }
                State::VersionSlash => {
                    if byte != b'/' {
                        return err!(InvalidVersion);
                    }
                    self.state = State::VersionMajorStart;
                }

                State::VersionMajorStart => {
                    if !matches::is_digit(byte) {
                        return err!(InvalidVersion);
                    }
                    request.set_version_major((byte - b'0') as u16);
                    self.state = State::VersionMajor;
                }

                State::VersionMajor => {
                    if byte == b'.' {
                        self.state = State::VersionMinorStart;
                    } else if matches::is_digit(byte) {
                        request.set_version_major(accumulate(request.version_major(), byte));
                    } else {
                        return err!(InvalidVersion);
                    }
                }

                State::VersionMinorStart => {
                    if !matches::is_digit(byte) {
                        return err!(InvalidVersion);
                    }
                    request.set_version_minor((byte - b'0') as u16);
                    self.state = State::VersionMinor;
                }

                State::VersionMinor => {
                    if byte == b'\r' {
                        self.state = State::ExpectingLf;
                    } else if byte == b'\n' {
                        self.state = State::ExpectingCr;
                    } else if matches::is_digit(byte) {
                        request.set_version_minor(accumulate(request.version_minor(), byte));
                    } else {
                        return err!(InvalidVersion);
                    }
                }

                State::ExpectingLf => {
                    if byte == b'\n' {
                        self.state = State::HeaderStart;
                    } else if byte == b'\r' {
                        // two CRs in a row: CR alone terminates lines, so
                        // the blank line is complete and the head ends here
                        return ParseResult::Ok(i + 1);
                    } else if byte == b'\t' || byte == b' ' {
                        self.state = State::HeaderWhitespace;
                    } else if matches::is_token(byte) {
                        self.header_name.clear();
                        self.header_name.put_u8(byte);
                        self.state = State::HeaderName;
                    } else {
                        return err!(InvalidHeaderName);
                    }
                }

                State::ExpectingCr => {
                    if byte == b'\r' {
                        self.state = State::HeaderStart;
                    } else if byte == b'\n' {
                        // two LFs in a row, same reasoning as doubled CR
                        return ParseResult::Ok(i + 1);
                    } else if byte == b'\t' || byte == b' ' {
                        self.state = State::HeaderWhitespace;
                    } else if matches::is_token(byte) {
                        self.header_name.clear();
                        self.header_name.put_u8(byte);
                        self.state = State::HeaderName;
                    } else {
                        return err!(InvalidHeaderName);
                    }
                }

                State::HeaderWhitespace => {
                    if byte == b'\r' {
                        self.state = State::ExpectingLf;
                    } else if byte == b'\n' {
                        self.state = State::ExpectingCr;
                    } else if byte != b'\t' && byte != b' ' {
                        if !matches::is_token(byte) {
                            return err!(InvalidHeaderName);
                        }
                        self.header_name.clear();
                        self.header_name.put_u8(byte);
                        self.state = State::HeaderName;
                    }
                }

                State::HeaderStart => {
                    if byte == b'\r' {
                        self.state = State::ExpectingFinalLf;
                    } else if byte == b'\n' {
                        self.state = State::ExpectingFinalCr;
                    } else if byte == b'\t' || byte == b' ' {
                        self.state = State::HeaderWhitespace;
                    } else if matches::is_token(byte) {
                        self.header_name.clear();
                        self.header_name.put_u8(byte);
                        self.state = State::HeaderName;
                    } else {
                        return err!(InvalidHeaderName);
                    }
                }

                State::HeaderName => {
                    if byte == b':' {
                        self.header_value.clear();
                        self.state = State::SpaceBeforeHeaderValue;
                    } else if !matches::is_token(byte) {
                        return err!(InvalidHeaderName);
                    } else if self.header_name.len() >= Self::HEADER_NAME_MAX {
                        return err!(HeaderNameTooLong);
                    } else {
                        self.header_name.put_u8(byte);
                    }
                }

                State::SpaceBeforeHeaderValue => {
                    if byte == b' ' {
                        self.state = State::HeaderValue;
                    } else if byte == b'\r' {
                        self.commit_header(request);
                        self.state = State::ExpectingLf;
                    } else if byte == b'\n' {
                        self.commit_header(request);
                        self.state = State::ExpectingCr;
                    } else if !matches::is_token(byte) {
                        return err!(InvalidHeaderValue);
                    } else {
                        self.header_value.put_u8(byte);
                        self.state = State::HeaderValue;
                    }
                }

                State::HeaderValue => {
                    if byte == b'\r' {
                        self.commit_header(request);
                        self.state = State::ExpectingLf;
                    } else if byte == b'\n' {
                        self.commit_header(request);
                        self.state = State::ExpectingCr;
                    } else if matches::is_control(byte) {
                        return err!(InvalidHeaderValue);
                    } else if self.header_value.len() >= Self::HEADER_VALUE_MAX {
                        return err!(HeaderValueTooLong);
                    } else {
                        self.header_value.put_u8(byte);
                    }
                }

                // the closing LF (or CR) is consumed when present, anything
                // else is left for the body
                State::ExpectingFinalLf => {
                    return ParseResult::Ok(if byte == b'\n' { i + 1 } else { i });
                }
                State::ExpectingFinalCr => {
                    return ParseResult::Ok(if byte == b'\r' { i + 1 } else { i });
                }
            }

            i += 1;
        }

        ParseResult::Pending
    }

    fn commit_method(&mut self) -> ByteStr {
        let method = self.method.split().freeze();
        // SAFETY: method octets are token characters, which are ASCII
        unsafe { ByteStr::from_utf8_unchecked(method) }
    }

    fn commit_header(&mut self, request: &mut Request) {
        let name = self.header_name.split().freeze();
        // SAFETY: name octets are token characters, which are ASCII
        let name = unsafe { ByteStr::from_utf8_unchecked(name) };
        request.headers_mut().append(name, self.header_value.split().freeze());
    }
}

impl Default for RequestParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Base-10 accumulation for version numbers, saturating on overflow.
fn accumulate(current: u16, digit: u8) -> u16 {
    current.saturating_mul(10).saturating_add((digit - b'0') as u16)
}
