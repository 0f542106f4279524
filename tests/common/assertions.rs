//! Custom assertion macros and utilities
//!
//! Provides assertion macros with more descriptive failure messages for API
//! responses.

/// Assert that a result is ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $message:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $message, e),
        }
    };
}

/// Assert that a string contains a substring
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        assert!(
            $haystack.contains($needle),
            "Expected '{}' to contain '{}'",
            $haystack,
            $needle
        );
    };
}

/// Assert that a response is an error envelope with the given status
///
/// Returns the parsed body for further checks.
#[macro_export]
macro_rules! assert_error_response {
    ($response:expr, $status:expr) => {{
        let response = $response;
        assert_eq!(response.status_code(), $status, "body: {}", response.text());
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false, "error body must carry success=false");
        assert!(body["message"].is_string(), "error body must carry a message");
        body
    }};
    ($response:expr, $status:expr, $needle:expr) => {{
        let body = $crate::assert_error_response!($response, $status);
        $crate::assert_contains!(body["message"].as_str().unwrap_or_default(), $needle);
        body
    }};
}
