// HOA Assistant Backend Entry Point

use anyhow::Context;
use hoa_assistant_core::actors::SupervisorHandle;
use hoa_assistant_core::brain::ResponseComposer;
use hoa_assistant_core::config::AppConfig;
use hoa_assistant_core::database::{self, SqliteConversationStore};
use hoa_assistant_core::fs_manager::{ObjectStore, StoragePaths};
use hoa_assistant_core::logging;
use hoa_assistant_core::server::{self, state::AppState};
use hoa_assistant_core::uploads::UploadService;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("failed to load configuration")?;
    logging::init_tracing(config.log_format)?;

    info!("Starting HOA assistant backend");

    let paths = StoragePaths::new(&config.data_dir);
    paths.init().await.context("failed to create data directories")?;

    let pool = database::init_db(&config.database_url)
        .await
        .context("failed to initialize database")?;

    let composer = ResponseComposer::new().with_link_limit(config.source_link_limit);
    let store = Arc::new(SqliteConversationStore::new(
        pool.clone(),
        config.default_user.clone(),
    ));
    let supervisor =
        SupervisorHandle::new(store, composer.clone(), config.supervisor_options());

    let uploads = UploadService::new(
        config.public_url.clone(),
        config.max_upload_bytes,
        ObjectStore::new(paths.uploads_dir()),
    );

    let state = AppState {
        pool,
        supervisor: supervisor.clone(),
        composer: Arc::new(composer),
        uploads: Arc::new(uploads),
        default_user: Arc::from(config.default_user.as_str()),
    };

    server::serve(state, config.bind_addr).await?;

    supervisor.shutdown().await?;
    info!("HOA assistant backend stopped");
    Ok(())
}
