//! `growthloop serve`: runs the HTTP API, grounded on `vibes-cli`'s
//! `commands::serve::run_foreground`.

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use tracing::info;

use growthloop_server::{AppState, GrowthloopServer, ServerConfig};
use growthloop_tasks::{TaskBroker, TaskResultStore};

use crate::wiring::build_components;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,
}

pub async fn run(args: ServeArgs) -> Result<()> {
    let components = build_components().await?;

    let broker: Arc<dyn TaskBroker> = components.broker.clone();
    let task_results: Arc<dyn TaskResultStore> = components.broker.clone();

    let app_state = Arc::new(AppState::new(
        components.store.clone(),
        components.store.clone(),
        components.store.clone(),
        components.store.clone(),
        components.store.clone(),
        broker,
        task_results,
        components.token_verifier,
        components.workflow,
        components.webhook_secret,
    ));

    let config = ServerConfig::new(args.host.clone(), args.port);
    info!(host = %args.host, port = args.port, "starting growthloop server");

    let server = GrowthloopServer::new(config, app_state);
    server.run().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        serve: ServeArgs,
    }

    #[test]
    fn serve_args_defaults() {
        let cli = TestCli::parse_from(["test"]);
        assert_eq!(cli.serve.port, DEFAULT_PORT);
        assert_eq!(cli.serve.host, DEFAULT_HOST);
    }

    #[test]
    fn serve_args_custom_port() {
        let cli = TestCli::parse_from(["test", "--port", "9000"]);
        assert_eq!(cli.serve.port, 9000);
        assert_eq!(cli.serve.host, DEFAULT_HOST);
    }

    #[test]
    fn serve_args_custom_host() {
        let cli = TestCli::parse_from(["test", "--host", "0.0.0.0"]);
        assert_eq!(cli.serve.host, "0.0.0.0");
    }

    #[test]
    fn serve_args_short_port_flag() {
        let cli = TestCli::parse_from(["test", "-p", "3000"]);
        assert_eq!(cli.serve.port, 3000);
    }
}
