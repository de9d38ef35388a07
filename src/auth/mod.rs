/// Authentication module
///
/// Access token signing/validation, refresh token lifecycle, bearer
/// extraction and password hashing.

mod bearer;
mod claims;
mod jwt;
mod password;
mod refresh_token;

pub use bearer::{bearer_token, extract_bearer_token};
pub use claims::Claims;
pub use jwt::{
    issue_access_token, issue_access_token_at, validate_access_token, validate_access_token_at,
};
pub use password::{
    hash_password, init_dummy_hash, verify_credentials, verify_password, HASH_COST,
};
pub use refresh_token::{
    generate_refresh_token, issue_refresh_token, issue_refresh_token_at, revoke_refresh_token,
    validate_refresh_token, validate_refresh_token_at, RefreshToken,
};
