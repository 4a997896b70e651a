// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use anyhow::Context;
use clap::Parser;
use ifc_json_export::{run, Cli, ExportConfig};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.log_level().as_str()),
    )
    .init();

    let config = ExportConfig::from(cli);
    let summary = run(&config)
        .with_context(|| format!("Failed to convert {}", config.input.display()))?;

    log::debug!("{:?}", summary);
    Ok(())
}
