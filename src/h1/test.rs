use super::{ParseError, RequestParser};
use crate::common::ParseResult;
use crate::request::Request;

fn feed(input: &[u8]) -> (ParseResult<usize, ParseError>, Request) {
    let mut parser = RequestParser::new();
    let mut request = Request::new();
    let result = parser.feed(input, &mut request);
    (result, request)
}

/// Feed `input` through one parser in `size`-byte chunks, returning the
/// total consumed count and the committed request.
fn feed_chunked(input: &[u8], size: usize) -> (usize, Request) {
    let mut parser = RequestParser::new();
    let mut request = Request::new();
    let mut offset = 0;

    for chunk in input.chunks(size) {
        match parser.feed(chunk, &mut request) {
            ParseResult::Pending => offset += chunk.len(),
            ParseResult::Ok(consumed) => return (offset + consumed, request),
            ParseResult::Err(err) => panic!("unexpected `ParseResult::Err`: {err:?}"),
        }
    }
    panic!("head never completed")
}

macro_rules! accept {
    ($input:expr) => {{
        let (result, request) = feed(&$input[..]);
        match result {
            ParseResult::Ok(consumed) => (consumed, request),
            ParseResult::Err(err) => panic!("unexpected `ParseResult::Err`: {err:?}"),
            ParseResult::Pending => panic!("unexpected `ParseResult::Pending`"),
        }
    }};
}

macro_rules! reject {
    ($input:expr, $err:ident) => {{
        let (result, _) = feed(&$input[..]);
        match result {
            ParseResult::Err(err) => assert_eq!(err, ParseError::$err),
            ParseResult::Ok(consumed) => panic!("expected `Err`, but accepted {consumed} bytes"),
            ParseResult::Pending => panic!("expected `Err`, but its `Pending`"),
        }
    }};
}

macro_rules! pending {
    ($input:expr) => {
        assert!(feed(&$input[..]).0.is_pending());
    };
}

#[test]
fn minimal_get() {
    let input = b"GET / HTTP/1.1\r\nHost: x\r\n\r\n";
    let (consumed, request) = accept!(input);

    assert_eq!(consumed, input.len());
    assert_eq!(request.method(), "GET");
    assert_eq!(request.resource(), b"/");
    assert_eq!(request.query_string(), b"");
    assert_eq!(request.version_major(), 1);
    assert_eq!(request.version_minor(), 1);
    assert_eq!(request.headers().len(), 1);
    assert_eq!(request.headers().get("Host"), Some(&b"x"[..]));
}

#[test]
fn bare_lf_termination() {
    let input = b"GET /a HTTP/1.0\nHost: y\n\n";
    let (consumed, request) = accept!(input);

    assert_eq!(consumed, input.len());
    assert_eq!(request.method(), "GET");
    assert_eq!(request.resource(), b"/a");
    assert_eq!(request.version_major(), 1);
    assert_eq!(request.version_minor(), 0);
    assert_eq!(request.headers().get("Host"), Some(&b"y"[..]));
}

#[test]
fn bare_cr_termination() {
    let input = b"GET / HTTP/1.1\rHost: x\r\r";
    let (consumed, request) = accept!(input);

    assert_eq!(consumed, input.len());
    assert_eq!(request.headers().get("Host"), Some(&b"x"[..]));
}

#[test]
fn lfcr_termination() {
    let input = b"GET / HTTP/1.1\n\rHost: x\n\r\n\r";
    let (consumed, request) = accept!(input);

    assert_eq!(consumed, input.len());
    assert_eq!(request.headers().get("Host"), Some(&b"x"[..]));
}

#[test]
fn doubled_cr_ends_the_head() {
    let input = b"GET / HTTP/1.1\r\r";
    let (consumed, request) = accept!(input);

    assert_eq!(consumed, input.len());
    assert!(request.headers().is_empty());
}

#[test]
fn missing_final_lf_leaves_the_byte() {
    // CR-terminated request line, then a bare-CR blank line: the head is
    // over and `X` already belongs to the body
    let input = b"GET / HTTP/1.1\r\n\rX";
    let (consumed, request) = accept!(input);

    assert_eq!(consumed, input.len() - 1);
    assert_eq!(&input[consumed..], b"X");
    assert!(request.headers().is_empty());
}

#[test]
fn query_string() {
    let input = b"GET /s?a=1&b=&c=2 HTTP/1.1\r\n\r\n";
    let (consumed, request) = accept!(input);

    assert_eq!(consumed, input.len());
    assert_eq!(request.resource(), b"/s");
    assert_eq!(request.query_string(), b"a=1&b=&c=2");
}

#[test]
fn multi_digit_version() {
    let (_, request) = accept!(b"GET / HTTP/10.23\r\n\r\n");
    assert_eq!(request.version_major(), 10);
    assert_eq!(request.version_minor(), 23);
}

#[test]
fn header_variants() {
    let input = b"GET / HTTP/1.1\r\nX-Empty:\r\nX-Space: \r\nA: b\r\nA: c\r\n\r\n";
    let (_, request) = accept!(input);

    assert_eq!(request.headers().get("X-Empty"), Some(&b""[..]));
    assert_eq!(request.headers().get("X-Space"), Some(&b""[..]));
    let all: Vec<_> = request.headers().get_all("A").collect();
    assert_eq!(all, [&b"b"[..], &b"c"[..]]);
}

#[test]
fn value_may_start_with_separator_after_the_space() {
    // only the first value octet is held to the token rules; past the
    // leading space anything non-control goes
    let (_, request) = accept!(b"GET / HTTP/1.1\r\nA: \"x\"\r\n\r\n");
    assert_eq!(request.headers().get("A"), Some(&b"\"x\""[..]));
}

#[test]
fn continuation_whitespace_starts_a_new_header() {
    let input = b"GET / HTTP/1.1\r\nA: b\r\n   folded: z\r\n\r\n";
    let (_, request) = accept!(input);

    assert_eq!(request.headers().get("A"), Some(&b"b"[..]));
    assert_eq!(request.headers().get("folded"), Some(&b"z"[..]));
}

#[test]
fn residual_bytes_after_the_head() {
    let input = b"POST /f HTTP/1.1\r\nContent-Length: 7\r\n\r\nk=v&x=y";
    let (consumed, request) = accept!(input);

    assert_eq!(&input[consumed..], b"k=v&x=y");
    assert_eq!(request.method(), "POST");
    assert_eq!(request.headers().get("Content-Length"), Some(&b"7"[..]));
}

#[test]
fn split_feeding_is_equivalent() {
    let input = b"POST /f?a=1 HTTP/1.1\r\nHost: example\r\nContent-Length: 7\r\n\r\nk=v&x=y";
    let (whole_consumed, whole) = accept!(input);

    for size in [1, 2, 3, 5, 7, 16] {
        let (consumed, request) = feed_chunked(input, size);
        assert_eq!(consumed, whole_consumed, "chunk size {size}");
        assert_eq!(request.method(), whole.method());
        assert_eq!(request.resource(), whole.resource());
        assert_eq!(request.query_string(), whole.query_string());
        assert_eq!(request.headers().len(), whole.headers().len());
        assert_eq!(request.headers().get("Host"), whole.headers().get("Host"));
    }
}

#[test]
fn prefix_of_a_valid_request_never_rejects() {
    let input = b"POST /f HTTP/1.1\r\nContent-Length: 7\r\n\r\n";

    for len in 0..input.len() {
        let (result, _) = feed(&input[..len]);
        assert!(result.is_pending(), "prefix of {len} bytes should be pending");
    }
    assert!(feed(input).0.is_ok());
}

#[test]
fn replaying_the_consumed_bytes_reproduces_the_head() {
    let input = b"GET /s?q=1 HTTP/1.1\r\nHost: x\r\n\r\ntrailing";
    let (consumed, first) = accept!(input);

    let (replayed, second) = accept!(input[..consumed]);
    assert_eq!(replayed, consumed);
    assert_eq!(second.method(), first.method());
    assert_eq!(second.resource(), first.resource());
    assert_eq!(second.query_string(), first.query_string());
    assert_eq!(second.headers().get("Host"), first.headers().get("Host"));
}

#[test]
fn reset_rearms_the_parser() {
    let mut parser = RequestParser::new();

    let mut first = Request::new();
    assert!(parser.feed(b"GET /a HTTP/1.1\r\n\r\n", &mut first).is_ok());

    parser.reset();

    let mut second = Request::new();
    assert!(parser.feed(b"PUT /b HTTP/1.0\n\n", &mut second).is_ok());
    assert_eq!(second.method(), "PUT");
    assert_eq!(second.resource(), b"/b");
}

#[test]
fn resumes_at_the_final_newline() {
    let mut parser = RequestParser::new();
    let mut request = Request::new();

    assert!(parser.feed(b"GET / HTTP/1.1\r\n\r", &mut request).is_pending());
    match parser.feed(b"\njunk", &mut request) {
        ParseResult::Ok(consumed) => assert_eq!(consumed, 1),
        other => panic!("expected accept, got {other:?}"),
    }
}

// ===== Ceilings =====

#[test]
fn method_ceiling() {
    let mut input = vec![b'A'; RequestParser::METHOD_MAX];
    input.extend_from_slice(b" / HTTP/1.1\r\n\r\n");
    let (_, request) = accept!(input);
    assert_eq!(request.method().len(), RequestParser::METHOD_MAX);

    let mut input = vec![b'A'; RequestParser::METHOD_MAX + 1];
    input.extend_from_slice(b" / HTTP/1.1\r\n\r\n");
    reject!(input, MethodTooLong);
}

#[test]
fn resource_ceiling() {
    let mut input = b"GET ".to_vec();
    input.extend_from_slice(&vec![b'a'; RequestParser::RESOURCE_MAX]);
    input.extend_from_slice(b" HTTP/1.1\r\n\r\n");
    let (_, request) = accept!(input);
    assert_eq!(request.resource().len(), RequestParser::RESOURCE_MAX);

    let mut input = b"GET ".to_vec();
    input.extend_from_slice(&vec![b'a'; RequestParser::RESOURCE_MAX + 1]);
    input.extend_from_slice(b" HTTP/1.1\r\n\r\n");
    reject!(input, TargetTooLong);
}

#[test]
fn query_string_ceiling() {
    let mut input = b"GET /?".to_vec();
    input.extend_from_slice(&vec![b'q'; RequestParser::QUERY_STRING_MAX]);
    input.extend_from_slice(b" HTTP/1.1\r\n\r\n");
    let (_, request) = accept!(input);
    assert_eq!(request.query_string().len(), RequestParser::QUERY_STRING_MAX);

    let mut input = b"GET /?".to_vec();
    input.extend_from_slice(&vec![b'q'; RequestParser::QUERY_STRING_MAX + 1]);
    input.extend_from_slice(b" HTTP/1.1\r\n\r\n");
    reject!(input, QueryTooLong);
}

#[test]
fn header_name_ceiling() {
    let mut input = b"GET / HTTP/1.1\r\n".to_vec();
    input.extend_from_slice(&vec![b'n'; RequestParser::HEADER_NAME_MAX]);
    input.extend_from_slice(b": v\r\n\r\n");
    let (_, request) = accept!(input);
    assert_eq!(request.headers().len(), 1);

    let mut input = b"GET / HTTP/1.1\r\n".to_vec();
    input.extend_from_slice(&vec![b'n'; RequestParser::HEADER_NAME_MAX + 1]);
    input.extend_from_slice(b": v\r\n\r\n");
    reject!(input, HeaderNameTooLong);
}

#[test]
fn header_value_ceiling() {
    let mut input = b"GET / HTTP/1.1\r\nX: ".to_vec();
    input.extend_from_slice(&vec![b'v'; RequestParser::HEADER_VALUE_MAX]);
    input.extend_from_slice(b"\r\n\r\n");
    let (_, request) = accept!(input);
    assert_eq!(request.headers().get("X").map(<[u8]>::len), Some(RequestParser::HEADER_VALUE_MAX));

    let mut input = b"GET / HTTP/1.1\r\nX: ".to_vec();
    input.extend_from_slice(&vec![b'v'; RequestParser::HEADER_VALUE_MAX + 1]);
    input.extend_from_slice(b"\r\n\r\n");
    reject!(input, HeaderValueTooLong);
}

// ===== Grammar rejects =====

#[test]
fn rejects() {
    reject!(b"GET / HXTP/1.1\r\n\r\n", InvalidVersion);
    reject!(b"GET / HTTP:1.1\r\n\r\n", InvalidVersion);
    reject!(b"GET / HTTP/x.1\r\n\r\n", InvalidVersion);
    reject!(b"GET / HTTP/1.x\r\n\r\n", InvalidVersion);
    reject!(b"GET / HTTP/1.1 \r\n\r\n", InvalidVersion);

    reject!(b"(/) / HTTP/1.1\r\n\r\n", InvalidMethod);
    reject!(b"GE\x01T / HTTP/1.1\r\n\r\n", InvalidMethod);

    reject!(b"GET /a\x01b HTTP/1.1\r\n\r\n", InvalidTarget);
    reject!(b"GET /s?a\x01 HTTP/1.1\r\n\r\n", InvalidQuery);

    reject!(b"GET / HTTP/1.1\r\nBad Name: x\r\n\r\n", InvalidHeaderName);
    reject!(b"GET / HTTP/1.1\r\n\x01: x\r\n\r\n", InvalidHeaderName);
    reject!(b"GET / HTTP/1.1\r\nA:\"x\"\r\n\r\n", InvalidHeaderValue);
    reject!(b"GET / HTTP/1.1\r\nA: a\x01b\r\n\r\n", InvalidHeaderValue);
}

#[test]
fn limit_errors_are_limits() {
    assert!(ParseError::MethodTooLong.is_limit());
    assert!(ParseError::HeaderValueTooLong.is_limit());
    assert!(ParseError::BodyTooLarge.is_limit());
    assert!(!ParseError::InvalidVersion.is_limit());
}

#[test]
fn pendings() {
    pending!(b"");
    pending!(b"GET");
    pending!(b"GET / HTTP/1.1");
    pending!(b"GET / HTTP/1.1\r");
    pending!(b"GET / HTTP/1.1\r\n");
    pending!(b"GET / HTTP/1.1\r\nHost: x\r\n");
    pending!(b"GET / HTTP/1.1\r\n\r");
}
