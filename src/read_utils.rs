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

use crate::file_handler::FileHandler;
use crate::{Error, Result};
use std::result::Result as StdResult;
use tracing::info;

/// Read a vector of objects from a file of a file_handler.
///
/// Header names are matched case-insensitively. A missing file is an error
/// only when `required_file` is set, otherwise it reads as no records.
pub(crate) fn read_objects<H, O>(
    file_handler: &mut H,
    file_name: &str,
    required_file: bool,
) -> Result<Vec<O>>
where
    for<'a> &'a mut H: FileHandler,
    O: for<'de> serde::Deserialize<'de>,
{
    let (reader, path) = if required_file {
        let (reader, path) = file_handler.get_file(file_name)?;
        (Some(reader), path)
    } else {
        file_handler.get_file_if_exists(file_name)?
    };
    let reader = match reader {
        Some(reader) => reader,
        None => {
            info!("Skipping {}", file_name);
            return Ok(vec![]);
        }
    };
    info!("Reading {:?}", path);
    let to_field_error = |source| Error::InvalidFieldFormat {
        file_name: file_name.to_string(),
        source,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers: csv::StringRecord = rdr
        .headers()
        .map_err(to_field_error)?
        .iter()
        .map(str::to_lowercase)
        .collect();
    rdr.set_headers(headers);
    rdr.deserialize()
        .collect::<StdResult<_, _>>()
        .map_err(to_field_error)
}
