use clap::Parser;
use log::info;
use rrecord::{
    clients::{YandexMusicClient, errors::Result},
    ripper::{ConfigBuilder, Ripper},
};

#[derive(Parser)]
#[command(name = "rrecord")]
#[command(version, about = "Download today's Radio Record playlist from Yandex Music", long_about = None)]
struct Cli {}

pub async fn run() -> Result<()> {
    let _cli = Cli::parse();

    info!("Building config ...");
    let config = ConfigBuilder::new().build()?;
    let catalog = YandexMusicClient::try_new(&config.token)?;
    let ripper = Ripper::new(config, catalog)?;
    ripper.run().await?;
    Ok(())
}
