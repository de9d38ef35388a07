/// Bearer credential extraction from the `Authorization` header.

use actix_web::http::header::{HeaderMap, AUTHORIZATION};

use crate::error::AuthError;

const BEARER_PREFIX: &str = "Bearer ";

/// Pull the credential out of an `Authorization` header value.
///
/// The scheme is matched case-sensitively. `"Bearer "` alone yields an empty
/// credential; rejecting it is left to whoever validates the token.
///
/// # Errors
/// - `HeaderMissing` if the value is absent or only whitespace
/// - `HeaderMalformed` if it does not start with `"Bearer "`
pub fn extract_bearer_token(header: Option<&str>) -> Result<String, AuthError> {
    let value = header.map(str::trim_start).unwrap_or_default();
    if value.trim_end().is_empty() {
        return Err(AuthError::HeaderMissing);
    }

    value
        .strip_prefix(BEARER_PREFIX)
        .map(|token| token.trim().to_string())
        .ok_or(AuthError::HeaderMalformed)
}

/// Read the bearer credential from request headers.
pub fn bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
    let header = match headers.get(AUTHORIZATION) {
        None => None,
        Some(value) => Some(value.to_str().map_err(|_| AuthError::HeaderMalformed)?),
    };
    extract_bearer_token(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::HeaderValue;

    #[test]
    fn test_extracts_token() {
        assert_eq!(extract_bearer_token(Some("Bearer abc123")), Ok("abc123".to_string()));
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        assert_eq!(
            extract_bearer_token(Some("  Bearer   abc123  ")),
            Ok("abc123".to_string())
        );
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(extract_bearer_token(None), Err(AuthError::HeaderMissing));
        assert_eq!(extract_bearer_token(Some("")), Err(AuthError::HeaderMissing));
        assert_eq!(extract_bearer_token(Some("   \t")), Err(AuthError::HeaderMissing));
    }

    #[test]
    fn test_wrong_scheme() {
        assert_eq!(
            extract_bearer_token(Some("Token abc123")),
            Err(AuthError::HeaderMalformed)
        );
        assert_eq!(
            extract_bearer_token(Some("bearer abc123")),
            Err(AuthError::HeaderMalformed)
        );
        assert_eq!(
            extract_bearer_token(Some("Bearerabc123")),
            Err(AuthError::HeaderMalformed)
        );
    }

    #[test]
    fn test_prefix_only_is_empty_credential() {
        assert_eq!(extract_bearer_token(Some("Bearer ")), Ok(String::new()));
        assert_eq!(extract_bearer_token(Some("Bearer    ")), Ok(String::new()));
    }

    #[test]
    fn test_from_header_map() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), Err(AuthError::HeaderMissing));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(bearer_token(&headers), Ok("xyz".to_string()));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&headers), Err(AuthError::HeaderMalformed));
    }

    #[test]
    fn test_non_ascii_header_is_malformed() {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xfftoken").unwrap(),
        );

        assert_eq!(bearer_token(&headers), Err(AuthError::HeaderMalformed));
    }
}
