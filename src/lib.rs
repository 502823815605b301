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

//! The `transit_feed` crate loads a [GTFS](https://gtfs.org/)-like transit
//! feed, links the cross-file identifiers into an indexed in-memory graph and
//! answers station and itinerary queries on it.
//!
//! ```no_run
//! # fn main() -> transit_feed::Result<()> {
//! let feed = transit_feed::read("path/to/feed")?;
//! let stations = feed.stations_by_route_type(transit_feed::objects::RouteType::Bus);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod builder;
pub mod configuration;
mod error;
pub mod file_handler;
pub mod model;
pub mod objects;
mod query;
pub(crate) mod read_utils;
pub mod records;
pub mod serde_utils;
#[doc(hidden)]
pub mod test_utils;

pub use crate::builder::FeedBuilder;
pub use crate::configuration::Configuration;
pub use crate::error::{Error, Result};
pub use crate::model::{Collections, Feed};

use crate::file_handler::{PathFileHandler, ZipHandler};
use crate::records::CsvRecordSource;
use std::path::Path;
use tracing::info;

/// Reads a feed from a directory or a zip archive with the default
/// configuration.
pub fn read<P: AsRef<Path>>(path: P) -> Result<Feed> {
    Reader::new(Configuration::default()).parse(path)
}

/// Loads a `Feed` from files, applying a `Configuration`.
#[derive(Debug, Default)]
pub struct Reader {
    configuration: Configuration,
}

impl Reader {
    /// Builds a Reader with a custom configuration.
    pub fn new(configuration: Configuration) -> Self {
        Reader { configuration }
    }

    /// Reads a feed from a path that is either a directory or a zip archive.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<Feed> {
        let p = path.as_ref();
        if p.is_file() {
            info!("Reading feed from zip {:?}", p);
            let reader = std::fs::File::open(p).map_err(|source| Error::UnreadableFile {
                file_name: p.display().to_string(),
                source,
            })?;
            self.parse_zip(reader, p)
        } else if p.is_dir() {
            info!("Reading feed from directory {:?}", p);
            self.parse_dir(p)
        } else {
            Err(Error::NotFileNorDirectory(p.display().to_string()))
        }
    }

    /// Reads a feed from a directory.
    pub fn parse_dir<P: AsRef<Path>>(self, path: P) -> Result<Feed> {
        let mut source = CsvRecordSource::new(PathFileHandler::new(path.as_ref().to_path_buf()));
        self.build(&mut source)
    }

    /// Reads a feed from a zip archive, `source_name` being only used in
    /// messages.
    pub fn parse_zip<R, P>(self, reader: R, source_name: P) -> Result<Feed>
    where
        R: std::io::Seek + std::io::Read,
        P: AsRef<Path>,
    {
        let mut source = CsvRecordSource::new(ZipHandler::new(reader, source_name)?);
        self.build(&mut source)
    }

    fn build<S: records::RecordSource>(self, source: &mut S) -> Result<Feed> {
        FeedBuilder::new()
            .feed_infos(self.configuration.feed_infos)
            .build(source)
    }
}
