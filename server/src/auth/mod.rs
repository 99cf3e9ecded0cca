mod crypto;
mod denylist;
mod extractor;
mod tokens;

pub use crypto::{hash_password, verify_password};
pub use denylist::TokenDenylist;
pub use extractor::{AuthUser, RefreshUser};
pub use tokens::{Claims, TokenError, TokenKind, TokenService};
