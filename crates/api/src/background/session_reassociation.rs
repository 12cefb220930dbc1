//! Re-point address-stamped characters at a freshly minted session.
//!
//! When a caller arrives without a session token but from a known network
//! address, their earlier characters are moved onto the new token so the
//! session view keeps showing them after the cookie is lost.

use t20_db::repositories::CharacterRepo;
use t20_db::DbPool;
use tokio::task::JoinHandle;

/// Spawn the re-association for `network_address`.
///
/// Failures are logged at `warn` and otherwise ignored; the triggering
/// request has already been answered.
pub fn spawn(pool: DbPool, network_address: String, session_token: String) -> JoinHandle<()> {
    tokio::spawn(async move {
        run(&pool, &network_address, &session_token).await;
    })
}

async fn run(pool: &DbPool, network_address: &str, session_token: &str) {
    match CharacterRepo::reassociate_session(pool, network_address, session_token).await {
        Ok(0) => {
            tracing::debug!(network_address, "Session reassociation: nothing to move");
        }
        Ok(moved) => {
            tracing::debug!(network_address, moved, "Session reassociation: characters moved");
        }
        Err(e) => {
            tracing::warn!(network_address, error = %e, "Session reassociation failed");
        }
    }
}
