//! Database health probe.

use mitto_connect::state::AppState;

use super::CommandError;

/// Print `healthy` or `unhealthy`; the latter fails the command.
pub async fn run(state: &AppState) -> Result<(), CommandError> {
    let healthy = state.database().check_healthy().await;

    #[allow(clippy::print_stdout)]
    {
        println!("{}", if healthy { "healthy" } else { "unhealthy" });
    }

    if healthy {
        Ok(())
    } else {
        Err(CommandError::Unhealthy)
    }
}
