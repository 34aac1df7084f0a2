use docserve::http::parser::{parse_request_line, ParseError};
use docserve::http::request::Method;

#[test]
fn test_parse_simple_get_request() {
    let parsed = parse_request_line("GET / HTTP/1.1").unwrap();

    assert_eq!(parsed.method, Method::GET);
    assert_eq!(parsed.path, "/");
    assert_eq!(parsed.version.as_deref(), Some("HTTP/1.1"));
}

#[test]
fn test_parse_request_with_path_and_query_string() {
    let parsed = parse_request_line("GET /search?q=rust HTTP/1.1").unwrap();

    assert_eq!(parsed.path, "/search?q=rust");
}

#[test]
fn test_parse_unknown_method_is_kept() {
    let parsed = parse_request_line("BREW /pot HTTP/1.1").unwrap();

    assert_eq!(parsed.method, Method::Extension("BREW".to_string()));
    assert_eq!(parsed.method.as_str(), "BREW");
}

#[test]
fn test_parse_lowercase_method_is_not_get() {
    let parsed = parse_request_line("get / HTTP/1.1").unwrap();
    assert_ne!(parsed.method, Method::GET);
}

#[test]
fn test_parse_various_http_methods() {
    let methods = vec![
        ("GET", Method::GET),
        ("POST", Method::POST),
        ("PUT", Method::PUT),
        ("DELETE", Method::DELETE),
        ("HEAD", Method::HEAD),
        ("OPTIONS", Method::OPTIONS),
        ("PATCH", Method::PATCH),
    ];

    for (method_str, expected_method) in methods {
        let line = format!("{} / HTTP/1.1", method_str);
        let parsed = parse_request_line(&line).unwrap();
        assert_eq!(parsed.method, expected_method);
    }
}

#[test]
fn test_parse_single_token() {
    assert_eq!(parse_request_line("GET"), Err(ParseError::InvalidRequest));
    assert_eq!(parse_request_line("GET "), Err(ParseError::InvalidRequest));
}

#[test]
fn test_parse_blank_line() {
    assert_eq!(parse_request_line(""), Err(ParseError::InvalidRequest));
    assert_eq!(parse_request_line("   "), Err(ParseError::InvalidRequest));
}

#[test]
fn test_parse_extra_tokens_ignored() {
    let parsed = parse_request_line("GET /a.txt HTTP/1.1 trailing junk").unwrap();

    assert_eq!(parsed.path, "/a.txt");
    assert_eq!(parsed.version.as_deref(), Some("HTTP/1.1"));
}
