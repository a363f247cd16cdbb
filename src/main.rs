use std::process::ExitCode;
use std::sync::Arc;

use folio::{logging, Server, Settings, Site};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            // The subscriber is configured from settings, so fall back to the
            // default format to report why they could not be loaded.
            logging::init(Default::default());
            error!("cannot start: {e}");
            return ExitCode::FAILURE;
        }
    };
    logging::init(settings.log_format);

    match run(settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("server error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(settings: Settings) -> Result<(), folio::Error> {
    info!(?settings, "starting folio");
    let server = Server::bind(&settings.listen_addr()).await?;
    let site = Arc::new(Site::new(settings)?);
    server.serve(site.router()).await
}
