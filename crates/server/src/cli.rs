use std::path::PathBuf;

use clap::Parser;

use crate::VapidPrivateKey;

#[derive(Debug, Clone, Parser)]
#[clap(name = "push notification server")]
pub struct Cli {
    #[clap(long, env, default_value = "3000")]
    pub port: u16,
    #[clap(long, env, default_value = "127.0.0.1")]
    pub bind_addr: String,
    /// Optional directory of static files (app shell, service worker) to serve
    #[clap(long, env)]
    pub assets_dir: Option<PathBuf>,
    /// Allowed CORS origin, `*` allows any
    #[arg(long, env, default_value = "*")]
    pub cors_origin: String,
    /// VAPID private key, base64url encoded
    #[arg(long, env, hide_env_values = true)]
    pub vapid_private_key: VapidPrivateKey,
    /// VAPID public key, base64url encoded. Handed to clients so they can subscribe
    #[arg(long, env)]
    pub vapid_public_key: String,
    #[arg(long, env, default_value = "mailto:admin@example.com")]
    pub vapid_subject: String,
    /// How long the push service should hold undelivered messages for
    #[arg(long, env, default_value = "60")]
    pub push_ttl_seconds: u32,
}
