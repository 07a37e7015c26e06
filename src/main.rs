// Copyright 2017 Dmitry Tantsur <divius.inside@gmail.com>
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

//! Azure NetApp Files pool change sample.

use std::process;

use log::{error, info};

use netapp_pool_change::{auth, Cloud, PoolChangeSample, Result, SampleConfig};

const HEADER: &str = "Azure NetAppFiles Rust SDK Samples - Sample project that performs a pool \
                      change on a Volume using the Azure NetApp Files SDK";

async fn run() -> Result<()> {
    let config = SampleConfig::load()?;
    config.validate()?;

    let credentials = auth::from_env()?;
    info!("Instantiating a new Azure NetApp Files management client...");
    let cloud = Cloud::from_credentials(credentials, &config.resource_group)?;

    let _ = PoolChangeSample::new(&cloud, &config).run().await?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    info!("{}", HEADER);
    info!("{}", "-".repeat(HEADER.len()));

    if let Err(err) = run().await {
        error!("{}", err);
        process::exit(1);
    }
}
