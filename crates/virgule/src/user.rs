// File: src/user.rs
// Purpose: Pluggable current-user resolution

use async_trait::async_trait;
use serde_json::Value;

use crate::request::RequestMeta;

/// Resolves the current user for a request.
///
/// Authentication policy lives outside this core; the dispatcher only
/// awaits this hook when a handler declares `$user`. Returning `None`
/// (or a falsy value) means "no user".
#[async_trait]
pub trait UserResolver: Send + Sync {
    async fn resolve(&self, req: &RequestMeta) -> Option<Value>;
}

/// The default resolver: there is never a current user.
pub struct NoUser;

#[async_trait]
impl UserResolver for NoUser {
    async fn resolve(&self, _req: &RequestMeta) -> Option<Value> {
        None
    }
}
