mod actions;
mod app;
mod app_state;
mod event_handlers;
mod export;
mod logging;
mod rendering;
mod requests;
mod settings;

use std::{fs, path::PathBuf, sync::Arc};

use app::App;
use color_eyre::eyre::WrapErr;
use export::Osc52Clipboard;
use querydeck_api::{ApiClient, LocalStore};
use settings::{STORE_FILE, Settings};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let dirs = settings::project_dirs();
    let settings = Settings::load(dirs.as_ref())?;
    let data_dir = dirs
        .as_ref()
        .map_or_else(|| PathBuf::from("."), |dirs| dirs.data_dir().to_path_buf());
    fs::create_dir_all(&data_dir).wrap_err_with(|| {
        format!("Failed to create data directory {}", data_dir.display())
    })?;

    let _log_guard = logging::init(&data_dir.join("logs"))?;
    let store = LocalStore::open(&data_dir.join(STORE_FILE))
        .wrap_err("Failed to open the local store")?;
    let api = Arc::new(ApiClient::new(&settings.api_base_url));

    let app = App::new(settings, store, api, Box::new(Osc52Clipboard));
    let terminal = ratatui::init();
    let result = app.run(terminal).await;
    ratatui::restore();
    result
}
