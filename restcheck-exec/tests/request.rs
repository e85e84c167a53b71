use restcheck_core::{Auth, TestCase};
use restcheck_exec::{build_request, BuildError};

#[test]
fn builds_basic_get() {
    let case = TestCase::new("t1", "get", "https://api.example.com/users");
    let req = build_request(&case).unwrap();
    assert_eq!(req.method, "GET");
    assert_eq!(req.url.as_str(), "https://api.example.com/users");
    assert!(req.headers.is_empty());
    assert!(req.body.is_empty());
}

#[test]
fn appends_and_encodes_query_params() {
    let mut case = TestCase::new("t1", "GET", "https://api.example.com/search");
    case.params.insert("q".to_string(), "a b".to_string());
    case.params.insert("page".to_string(), "2".to_string());
    let req = build_request(&case).unwrap();
    let query = req.url.query().unwrap();
    assert!(query.contains("q=a+b"));
    assert!(query.contains("page=2"));
}

#[test]
fn merges_params_with_existing_query() {
    let mut case = TestCase::new("t1", "GET", "https://api.example.com/search?lang=en");
    case.params.insert("q".to_string(), "x".to_string());
    let req = build_request(&case).unwrap();
    let query = req.url.query().unwrap();
    assert!(query.contains("lang=en"));
    assert!(query.contains("q=x"));
}

#[test]
fn basic_auth_sets_authorization_header() {
    let mut case = TestCase::new("t1", "GET", "https://api.example.com/");
    case.auth = Auth::Basic {
        username: "user".to_string(),
        password: "pass".to_string(),
    };
    let req = build_request(&case).unwrap();
    // base64("user:pass")
    assert_eq!(req.headers["Authorization"], "Basic dXNlcjpwYXNz");
}

#[test]
fn bearer_auth_sets_authorization_header() {
    let mut case = TestCase::new("t1", "GET", "https://api.example.com/");
    case.auth = Auth::Bearer {
        token: "tok123".to_string(),
    };
    let req = build_request(&case).unwrap();
    assert_eq!(req.headers["Authorization"], "Bearer tok123");
}

#[test]
fn bodied_request_defaults_content_type() {
    let mut case = TestCase::new("t1", "POST", "https://api.example.com/users");
    case.body = Some(r#"{"name":"ada"}"#.to_string());
    let req = build_request(&case).unwrap();
    assert_eq!(req.headers["Content-Type"], "application/json");
    assert_eq!(req.body, br#"{"name":"ada"}"#);
}

#[test]
fn authored_content_type_wins() {
    let mut case = TestCase::new("t1", "POST", "https://api.example.com/users");
    case.body = Some("a=1".to_string());
    case.headers.insert(
        "content-type".to_string(),
        "application/x-www-form-urlencoded".to_string(),
    );
    let req = build_request(&case).unwrap();
    assert_eq!(
        req.headers["content-type"],
        "application/x-www-form-urlencoded"
    );
    assert!(!req.headers.contains_key("Content-Type"));
}

#[test]
fn invalid_url_is_a_build_error() {
    let case = TestCase::new("t1", "GET", "not a url");
    match build_request(&case) {
        Err(BuildError::Url { url, .. }) => assert_eq!(url, "not a url"),
        other => panic!("expected url error, got {other:?}"),
    }
}

#[test]
fn empty_method_is_a_build_error() {
    let case = TestCase::new("t1", "  ", "https://api.example.com/");
    assert!(matches!(build_request(&case), Err(BuildError::EmptyMethod)));
}
