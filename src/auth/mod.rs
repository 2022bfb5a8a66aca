//! Supabase-backed authentication
//!
//! Handles:
//! - Email/password and OAuth sign-in flows
//! - The OAuth callback (code exchange)
//! - Per-request session access

mod callback;
mod oauth;
pub mod pkce;
pub mod redirect;
pub mod session;

pub use callback::{CallbackOutcome, CallbackQuery, resolve_callback};
pub use oauth::auth_router;
pub use session::{CookieSettings, QueryBuilder, SessionClient};
