use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Restful Objects fault-translation server
#[derive(Debug, Parser)]
#[command(name = "restful", about = "Serves Restful Objects fault responses")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "restful.toml", env = "RESTFUL_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "RESTFUL_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Log filter directive (e.g. `info` or `restful_server=debug`)
    #[arg(long, default_value = "info", env = "RESTFUL_LOG")]
    pub log: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listen_override_parses_socket_address() {
        let args = Args::try_parse_from(["restful", "-c", "/etc/restful.toml", "--listen", "127.0.0.1:9090"]).unwrap();

        assert_eq!(args.config, PathBuf::from("/etc/restful.toml"));
        assert_eq!(args.listen, Some(SocketAddr::from(([127, 0, 0, 1], 9090))));
    }

    #[test]
    fn rejects_malformed_listen_address() {
        assert!(Args::try_parse_from(["restful", "--listen", "localhost"]).is_err());
    }
}
