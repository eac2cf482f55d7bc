//! Reply accumulation (state, embeds, flags, mentions) and limit checks.

pub mod embed;
pub mod flags;
pub mod limits;
pub mod mention;
pub mod state;
