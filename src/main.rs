use clap::Parser;
use orchest_api::{
    bootstrap,
    config::{CliArgs, Command},
    docs,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliArgs::parse();

    bootstrap::init_base().await;

    match cli.command.unwrap_or_default() {
        Command::Serve => {
            let app = bootstrap::create_app(&cli.config).await?;
            bootstrap::serve(app).await?;
        }
        Command::Docs(args) => docs::generate_docs(&args.output).await?,
    }

    Ok(())
}
