use std::{
    net::{IpAddr, SocketAddr},
    str::FromStr,
};

use clap::Parser;
use server::{
    app,
    cli::Cli,
    push::{VapidConfig, WebPushTransport},
    AppState, Transport,
};
use shared::*;
use tokio::net::TcpListener;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    load_dotenv()?;
    configure_tracing();

    let args = Cli::parse();
    debug!(?args);

    let transport = WebPushTransport::new(VapidConfig {
        private_key: args.vapid_private_key.clone(),
        subject: args.vapid_subject.clone(),
        ttl_seconds: args.push_ttl_seconds,
    })?;

    let state = AppState::new(
        Transport::new(transport),
        args.vapid_public_key.clone().into(),
    );

    let socket = SocketAddr::new(IpAddr::from_str(&args.bind_addr)?, args.port);

    let listener = TcpListener::bind(socket).await?;
    info!("Server started on {}", listener.local_addr()?);
    info!("Subscriptions are held in memory and will be lost when the server stops");

    axum::serve(listener, app(state, &args)?).await?;

    Ok(())
}
