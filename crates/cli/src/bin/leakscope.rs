use anyhow::Result;
use clap::Parser;
use cli::{Cli, Workspace};
use logger::LogFormat;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logger::init("warn,cli=info", LogFormat::from_env());

    let args = Cli::parse();
    let settings = settings_loader::resolve_settings(args.settings.as_ref())?;
    let workspace = Workspace::from_settings(&settings)?;

    let output = workspace.execute(&args.command, args.json).await?;
    println!("{output}");
    Ok(())
}
