pub mod session;
pub mod token;

pub use session::{extract_token, Session, TOKEN_COOKIE};
pub use token::{check_token, check_token_at, decode_claims, is_token_valid, is_token_valid_at, Claims, TokenError};
