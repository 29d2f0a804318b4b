// Copyright 2026 Csvdrop Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Csvdrop Server - Main entry point.

use anyhow::Result;
use csvdrop_server::{App, Config};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "csvdrop_api=info,csvdrop_core=info,csvdrop_server=info".to_string());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Csvdrop server starting...");

    let config = Config::load()?;

    let app = App::new(config).await?;
    app.run().await?;

    Ok(())
}
