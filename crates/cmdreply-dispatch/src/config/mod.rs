//! Reply dispatch config loader (strict parsing).

pub mod schema;

use std::fs;

use cmdreply_core::error::{ReplyError, Result};

pub use schema::{DispatchSection, LimitsSection, ReplyConfig};

pub fn load_from_file(path: &str) -> Result<ReplyConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| ReplyError::Config(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ReplyConfig> {
    let cfg: ReplyConfig = serde_yaml::from_str(s)
        .map_err(|e| ReplyError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
