use anyhow::Context;
use clap::Parser;
use icon_tracker::{
    args::{ExportCli, ProjectPaths},
    export::export_icons,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = ExportCli::parse();

    let paths = ProjectPaths::resolve(cli.project_root).context("Resolving the project root")?;
    let output = paths.icon_data_json();

    match export_icons(&paths.tracker(), &output) {
        Ok(count) => log::info!("Exported {} icons to {:?}", count, output),
        Err(e) if e.is_missing_input() => log::error!("{}", e),
        Err(e) => return Err(e).context("Exporting icon data"),
    }

    Ok(())
}
