use actix_web::http::header;
use actix_web::HttpRequest;

use crate::anonymizer::{Anonymizer, DemoMode};
use crate::models::User;

/// Cookie the login handler mirrors the bearer token into
pub const TOKEN_COOKIE: &str = "gambino_token";

/// An authenticated operator for the span of one request
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self { token: token.into(), user }
    }

    pub fn demo_mode(&self) -> DemoMode {
        DemoMode::from(self.user.is_demo())
    }

    pub fn anonymizer(&self) -> Anonymizer<'static> {
        Anonymizer::new(self.demo_mode())
    }
}

/// Bearer header first, then the session cookie
pub fn extract_token(request: &HttpRequest) -> Option<String> {
    let from_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty());

    if let Some(token) = from_header {
        return Some(token.to_string());
    }

    request
        .cookie(TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;

    #[test]
    fn test_bearer_header_wins_over_cookie() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer from-header"))
            .cookie(Cookie::new(TOKEN_COOKIE, "from-cookie"))
            .to_http_request();
        assert_eq!(extract_token(&req).as_deref(), Some("from-header"));
    }

    #[test]
    fn test_cookie_fallback() {
        let req = TestRequest::default()
            .cookie(Cookie::new(TOKEN_COOKIE, "from-cookie"))
            .to_http_request();
        assert_eq!(extract_token(&req).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn test_no_token() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic dXNlcjpwYXNz"))
            .to_http_request();
        assert_eq!(extract_token(&req), None);
    }

    #[test]
    fn test_demo_flag_drives_anonymizer() {
        let demo_user = User { id: "demo".into(), is_demo: Some(true), ..Default::default() };
        assert_eq!(Session::new("t", demo_user).demo_mode(), DemoMode::Active);
        let staff = User { id: "staff".into(), ..Default::default() };
        assert!(!Session::new("t", staff).anonymizer().mode().is_active());
    }
}
