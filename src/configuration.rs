// Copyright (C) 2017 Hove and/or its affiliates.
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by the
// Free Software Foundation, version 3.

// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more
// details.

// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>
//! Configuration applied when reading a feed.

use crate::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::path;
use tracing::info;

/// Options applied when reading a feed.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub struct Configuration {
    /// Free-form key/value metadata carried into the loaded
    /// [`Feed`](crate::Feed)
    #[serde(default)]
    pub feed_infos: BTreeMap<String, String>,
}

/// Read a JSON configuration file, or fall back on the default
/// configuration when no path is given.
///
/// Below is an example of this file
/// ```text
/// {
///     "feed_infos": {
///         "feed_publisher_name": "The Great Data Publisher",
///         "feed_license": "ODbL"
///     }
/// }
/// ```
pub fn read_config<P: AsRef<path::Path>>(config_path: Option<P>) -> Result<Configuration> {
    let config_path = match config_path {
        Some(config_path) => config_path,
        None => return Ok(Configuration::default()),
    };
    let config_path = config_path.as_ref();
    info!("Reading configuration from {:?}", config_path);
    let json_config_file = File::open(config_path).map_err(|source| Error::UnreadableFile {
        file_name: config_path.display().to_string(),
        source,
    })?;
    serde_json::from_reader(json_config_file).map_err(|source| Error::Configuration {
        path: config_path.display().to_string(),
        source,
    })
}
