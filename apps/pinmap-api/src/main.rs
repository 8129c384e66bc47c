use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = pinmap_api::Args::parse();

	pinmap_api::run(args).await
}
