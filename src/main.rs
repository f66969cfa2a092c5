use job_xml_converter::errors::{AppError, AppResult};
use job_xml_converter::{cli, server};
use tracing_subscriber::EnvFilter;

fn main() -> AppResult<()> {
    let config = cli::parse_args()?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let rt = tokio::runtime::Runtime::new().map_err(|e| AppError::IoError(e.to_string()))?;
    rt.block_on(server::serve(config))
}
