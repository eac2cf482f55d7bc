//! cmdreply-dispatch
//!
//! Reads a reply description (YAML), finalizes it, and submits it through the
//! dry-run transport, which logs the exact envelope and attachment parts.
//!
//! Usage: `cmdreply-dispatch <reply.yaml> [config.yaml]`
//! Logging follows `RUST_LOG` (e.g. `RUST_LOG=info`).

use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use cmdreply_core::error::{ReplyError, Result};
use cmdreply_dispatch::{config, dispatch::ReplyDispatcher, reply_file::ReplyFile, transport::DryRunTransport};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(code = e.code().as_str(), error = %e, "reply failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let reply_path = args
        .next()
        .ok_or_else(|| ReplyError::InvalidParameter("usage: cmdreply-dispatch <reply.yaml> [config.yaml]".into()))?;

    let cfg = match args.next() {
        Some(p) => config::load_from_file(&p)?,
        None => config::load_from_str("version: 1")?,
    };

    let transport = Arc::new(DryRunTransport::new());
    let dispatcher = ReplyDispatcher::from_config(&cfg, transport);

    let action = ReplyFile::load(Path::new(&reply_path))?.into_action(&dispatcher)?;
    let handle = action.submit().await?;
    handle.wait().await?;

    tracing::info!(interaction = handle.interaction().id, state = ?handle.state(), "reply delivered");
    print!("{}", dispatcher.metrics().render());
    Ok(())
}
