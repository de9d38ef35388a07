/// Middleware module
///
/// Authentication for access-protected scopes.

mod jwt_middleware;

pub use jwt_middleware::{AuthenticatedUser, JwtMiddleware};
