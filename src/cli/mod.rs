use clap::Parser;

use crate::config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "ticket-dashboard")]
#[command(about = "Web dashboard for configuring the ticket bot per guild")]
#[command(version)]
pub struct Cli {
    #[arg(long, help = "Port to listen on (overrides PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Interface to bind (overrides BIND_HOST)")]
    pub host: Option<String>,
}

impl Cli {
    /// Flags win over the environment.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
    }
}
