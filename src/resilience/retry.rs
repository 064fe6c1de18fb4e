use std::future::Future;

use tracing::{error, warn};

use crate::cache::token::Token;
use crate::error::GatewayResult;
use crate::sources::content::UpstreamError;
use crate::sources::oauth2::TokenManager;

/// One initial attempt plus at most one retry after a forced re-acquisition.
const MAX_ATTEMPTS: u32 = 2;

/// Run an upstream operation with a valid token, re-authenticating once on 401.
///
/// The retry happens only when the rejected token was already cached before
/// this call; a token acquired for this very call is not retried. Every
/// other failure is returned as is.
pub async fn run_with_reauth<F, Fut, T>(tokens: &TokenManager, mut operation: F) -> GatewayResult<T>
where
    F: FnMut(Token) -> Fut,
    Fut: Future<Output = Result<T, UpstreamError>>,
{
    let mut had_cached_token = tokens.is_valid().await;
    let mut attempt = 1;

    loop {
        let token = tokens.ensure_valid().await?;
        match operation(token.clone()).await {
            Ok(value) => return Ok(value),
            Err(UpstreamError::Unauthorized) if had_cached_token && attempt < MAX_ATTEMPTS => {
                warn!("attempt {attempt}/{MAX_ATTEMPTS} rejected by upstream, re-acquiring token");
                tokens.invalidate(&token).await;
                had_cached_token = false;
                attempt += 1;
            }
            Err(e) => {
                error!("upstream call failed after {attempt} attempt(s): {e}");
                return Err(e.into());
            }
        }
    }
}
