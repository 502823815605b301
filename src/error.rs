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

//! Errors raised while loading a feed.
//!
//! Every error is fatal to the load: no partially linked `Feed` is ever
//! returned. Queries on a built `Feed` never fail, an unknown id is simply
//! `None` or an empty set.
use thiserror::Error;

/// An error that can occur when loading a transit feed.
#[derive(Error, Debug)]
pub enum Error {
    /// A mandatory file is not present in the feed
    #[error("file '{0}' not found")]
    MissingFile(String),
    /// A file is present but cannot be opened or read
    #[error("impossible to read '{file_name}'")]
    UnreadableFile {
        /// The file that could not be read
        file_name: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// A record references an identifier unknown among the already loaded objects
    #[error("{referenced_by} references unknown {object} '{id}'")]
    MissingReference {
        /// Kind of object that was looked up
        object: &'static str,
        /// The identifier that could not be resolved
        id: String,
        /// Description of the record holding the reference
        referenced_by: String,
    },
    /// Two records claim the same identifier
    #[error("{object} '{id}' is declared more than once")]
    DuplicateKey {
        /// Kind of object
        object: &'static str,
        /// The duplicated identifier
        id: String,
    },
    /// A field cannot be decoded (date, number, flag...)
    #[error("invalid field format in '{file_name}'")]
    InvalidFieldFormat {
        /// The file containing the invalid field
        file_name: String,
        /// The initial error of the csv library
        #[source]
        source: csv::Error,
    },
    /// An integer code outside of the known values of an enumeration
    #[error("'{code}' is not a valid {enumeration}")]
    InvalidEnumValue {
        /// Name of the enumeration
        enumeration: &'static str,
        /// The rejected code
        code: i64,
    },
    /// Following the parents of a stop never reaches a station
    #[error("stop '{0}' belongs to a cyclic parent_station chain")]
    CyclicStopHierarchy(String),
    /// The given path is neither a directory nor an archive
    #[error("'{0}' is neither a file nor a directory, cannot read a feed from it")]
    NotFileNorDirectory(String),
    /// The configuration file cannot be decoded
    #[error("invalid configuration file '{path}'")]
    Configuration {
        /// Path of the configuration file
        path: String,
        /// The initial error of the json library
        #[source]
        source: serde_json::Error,
    },
    /// Error when trying to unzip the feed archive
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}

/// The corresponding result type used by the crate.
pub type Result<T> = std::result::Result<T, Error>;
