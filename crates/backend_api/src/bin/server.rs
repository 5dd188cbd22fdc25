use backend_api::{run_server, AppState};
use std::{env, path::PathBuf};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // SETTINGS_PATH, else ./settings.json, else built-in defaults; env vars on top
    let settings_path = env::var("SETTINGS_PATH").ok().map(PathBuf::from);
    let settings = settings_loader::resolve_settings(settings_path.as_ref())?;

    println!("Leakscope API Server");
    println!("====================");
    println!("Assistant endpoint: {}", settings.assistant_endpoint);
    println!("Data dir: {}", settings.data_dir);
    println!("Listening on: {}:{}", settings.host, settings.port);
    println!();

    let state = AppState::from_settings(&settings)?;
    run_server(state, &settings.host, settings.port).await?;

    Ok(())
}
