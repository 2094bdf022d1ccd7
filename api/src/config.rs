use clap::Parser;
use std::net::SocketAddr;

#[derive(Clone, Debug, Parser)]
pub struct ApiConfig {
    #[clap(short, long, env = "SIGNET_API_BIND_ADDR", default_value = "0.0.0.0:4000")]
    pub bind_addr: SocketAddr,

    #[clap(long, env = "SIGNET_API_PUBLIC_URL", default_value = "http://localhost:4000")]
    pub public_url: String,

    #[clap(
        long,
        env = "SIGNET_DB_URI",
        default_value = "mongodb://localhost:27017/signet"
    )]
    pub db_uri: String,

    /// Identifier of the certificate authority this API administers.
    #[clap(long, env = "SIGNET_AUTHORITY_ID", default_value = "signet")]
    pub authority_id: String,

    /// Print the OpenAPI document to stdout and exit.
    #[clap(long)]
    pub dump_openapi: bool,
}
