//! Command line and environment configuration for the server.

use std::net::{IpAddr, SocketAddr};

use clap::Parser;

/// The REST API and dashboard server for Ledgerly.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// The port to serve the API and dashboard from.
    #[arg(short, long, env = "PORT")]
    pub port: u16,

    /// File path to the application SQLite database.
    #[arg(long, env = "DATABASE_URL")]
    pub db_path: String,

    /// The IP address to listen on.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,
}

impl Config {
    /// The socket address the server should bind to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
