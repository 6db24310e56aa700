//! `source-id`: print the vendored engine's source id.

use crate::cli::{RuntimeConfig, SourceIdArgs};
use crate::error::Result;
use crate::vendor::source_id::read_source_id;

pub async fn execute(args: &SourceIdArgs, config: &RuntimeConfig) -> Result<i32> {
    let id = read_source_id(&args.root).await?;
    config.output().result(&id)?;
    Ok(0)
}
