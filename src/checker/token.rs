// src/checker/token.rs
// =============================================================================
// Random path segments for wildcard detection.
//
// The brute-forcer asks for "<dir><token>" before guessing any words. A
// server that says yes to a random UUID says yes to everything.
// =============================================================================

use uuid::Uuid;

use super::TokenSource;

/// 32 hex characters; no real server has a path like that.
#[derive(Debug, Default)]
pub struct UuidTokens;

impl TokenSource for UuidTokens {
    fn token(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}
