use tracing::info;

use crate::{http_server::run_server, AppState, Result};

pub(crate) async fn serve() -> Result<()> {
    let app_state = AppState::from_env().await?;

    info!(
        database_url = %app_state.app.database_url,
        timezone = %app_state.app.display_timezone,
        "Serving recipes"
    );
    run_server(app_state).await?;

    info!("Main Returning");

    Ok(())
}
