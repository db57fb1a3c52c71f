use cortex::{
    cli::{Cli, CliHandler},
    settings::Settings,
};
use std::process;

fn init_logging(cli: &Cli) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(cli.log_level());
    // RUST_LOG still wins when set
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.format_timestamp(None).init();
}

#[tokio::main]
async fn main() {
    // clap prints usage and exits with 2 on bad arguments
    let cli = Cli::parse_args();
    init_logging(&cli);

    if let Err(e) = cli.validate() {
        eprintln!("❌ {}", e);
        process::exit(e.exit_code());
    }

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ Failed to load settings: {}", e);
            process::exit(e.exit_code());
        }
    };

    let handler = CliHandler::new(cli, settings);

    let exit_code = match handler.run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ {}", e);
            e.exit_code()
        }
    };

    process::exit(exit_code);
}
