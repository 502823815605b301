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

//! Flat records of a feed, one structure per file, still referencing each
//! other by identifier.
//!
//! Enumerations are kept as their integer code here; they are validated when
//! the [`FeedBuilder`](crate::FeedBuilder) turns records into objects.

use crate::file_handler::FileHandler;
use crate::objects::Date;
use crate::read_utils::read_objects;
use crate::serde_utils::*;
use crate::Result;
use serde::Deserialize;

/// A line of `routes.txt`
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub struct RouteRecord {
    pub route_id: String,
    #[serde(default, deserialize_with = "de_option_non_blank_string")]
    pub route_short_name: Option<String>,
    #[serde(default, deserialize_with = "de_option_non_blank_string")]
    pub route_long_name: Option<String>,
    pub route_type: i64,
    #[serde(default, deserialize_with = "de_option_non_blank_string")]
    pub route_color: Option<String>,
}

/// A line of `calendar.txt`
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub struct CalendarRecord {
    pub service_id: String,
    #[serde(deserialize_with = "de_from_u8")]
    pub monday: bool,
    #[serde(deserialize_with = "de_from_u8")]
    pub tuesday: bool,
    #[serde(deserialize_with = "de_from_u8")]
    pub wednesday: bool,
    #[serde(deserialize_with = "de_from_u8")]
    pub thursday: bool,
    #[serde(deserialize_with = "de_from_u8")]
    pub friday: bool,
    #[serde(deserialize_with = "de_from_u8")]
    pub saturday: bool,
    #[serde(deserialize_with = "de_from_u8")]
    pub sunday: bool,
    #[serde(deserialize_with = "de_from_date_string")]
    pub start_date: Date,
    #[serde(deserialize_with = "de_from_date_string")]
    pub end_date: Date,
}

/// A line of `calendar_dates.txt`
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub struct CalendarDateRecord {
    pub service_id: String,
    #[serde(deserialize_with = "de_from_date_string")]
    pub date: Date,
    pub exception_type: i64,
}

/// A line of `trips.txt`
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub struct TripRecord {
    pub trip_id: String,
    pub route_id: String,
    pub service_id: String,
    #[serde(default, deserialize_with = "de_option_non_blank_string")]
    pub trip_headsign: Option<String>,
    #[serde(default, deserialize_with = "de_option_non_blank_string")]
    pub direction_id: Option<String>,
}

/// A line of `stops.txt`
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub struct StopRecord {
    pub stop_id: String,
    #[serde(default, deserialize_with = "de_option_non_blank_string")]
    pub stop_code: Option<String>,
    #[serde(default, deserialize_with = "de_option_non_blank_string")]
    pub stop_name: Option<String>,
    pub stop_lat: f64,
    pub stop_lon: f64,
    #[serde(default, deserialize_with = "de_option_non_blank_string")]
    pub location_type: Option<String>,
    #[serde(default, deserialize_with = "de_option_non_blank_string")]
    pub parent_station: Option<String>,
    #[serde(default, deserialize_with = "de_option_non_blank_string")]
    pub platform_code: Option<String>,
}

/// A line of `stop_times.txt`
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub struct StopTimeRecord {
    pub trip_id: String,
    pub stop_id: String,
    #[serde(default, deserialize_with = "de_option_non_blank_string")]
    pub arrival_time: Option<String>,
    #[serde(default, deserialize_with = "de_option_non_blank_string")]
    pub departure_time: Option<String>,
    pub stop_sequence: u32,
    /// blank or absent means `0`
    #[serde(default)]
    pub pickup_type: Option<i64>,
    /// blank or absent means `0`
    #[serde(default)]
    pub drop_off_type: Option<i64>,
}

/// Provider of the records of a feed.
///
/// The [`FeedBuilder`](crate::FeedBuilder) calls each method exactly once,
/// in the dependency order of the linking (routes, calendars, calendar
/// dates, trips, stops, stop times).
pub trait RecordSource {
    /// Records of `routes.txt`
    fn routes(&mut self) -> Result<Vec<RouteRecord>>;
    /// Records of `calendar.txt`
    fn calendars(&mut self) -> Result<Vec<CalendarRecord>>;
    /// Records of `calendar_dates.txt`, which may be empty
    fn calendar_dates(&mut self) -> Result<Vec<CalendarDateRecord>>;
    /// Records of `trips.txt`
    fn trips(&mut self) -> Result<Vec<TripRecord>>;
    /// Records of `stops.txt`
    fn stops(&mut self) -> Result<Vec<StopRecord>>;
    /// Records of `stop_times.txt`
    fn stop_times(&mut self) -> Result<Vec<StopTimeRecord>>;
}

/// Records already in memory.
#[derive(Debug, Default, Clone)]
#[allow(missing_docs)]
pub struct FeedRecords {
    pub routes: Vec<RouteRecord>,
    pub calendars: Vec<CalendarRecord>,
    pub calendar_dates: Vec<CalendarDateRecord>,
    pub trips: Vec<TripRecord>,
    pub stops: Vec<StopRecord>,
    pub stop_times: Vec<StopTimeRecord>,
}

impl RecordSource for FeedRecords {
    fn routes(&mut self) -> Result<Vec<RouteRecord>> {
        Ok(std::mem::take(&mut self.routes))
    }
    fn calendars(&mut self) -> Result<Vec<CalendarRecord>> {
        Ok(std::mem::take(&mut self.calendars))
    }
    fn calendar_dates(&mut self) -> Result<Vec<CalendarDateRecord>> {
        Ok(std::mem::take(&mut self.calendar_dates))
    }
    fn trips(&mut self) -> Result<Vec<TripRecord>> {
        Ok(std::mem::take(&mut self.trips))
    }
    fn stops(&mut self) -> Result<Vec<StopRecord>> {
        Ok(std::mem::take(&mut self.stops))
    }
    fn stop_times(&mut self) -> Result<Vec<StopTimeRecord>> {
        Ok(std::mem::take(&mut self.stop_times))
    }
}

/// Records decoded from the CSV files of a [`FileHandler`].
pub struct CsvRecordSource<H> {
    file_handler: H,
}

impl<H> CsvRecordSource<H>
where
    for<'a> &'a mut H: FileHandler,
{
    /// Reads the files of the given handler
    pub fn new(file_handler: H) -> Self {
        CsvRecordSource { file_handler }
    }
}

impl<H> RecordSource for CsvRecordSource<H>
where
    for<'a> &'a mut H: FileHandler,
{
    fn routes(&mut self) -> Result<Vec<RouteRecord>> {
        read_objects(&mut self.file_handler, "routes.txt", true)
    }
    fn calendars(&mut self) -> Result<Vec<CalendarRecord>> {
        read_objects(&mut self.file_handler, "calendar.txt", true)
    }
    fn calendar_dates(&mut self) -> Result<Vec<CalendarDateRecord>> {
        read_objects(&mut self.file_handler, "calendar_dates.txt", false)
    }
    fn trips(&mut self) -> Result<Vec<TripRecord>> {
        read_objects(&mut self.file_handler, "trips.txt", true)
    }
    fn stops(&mut self) -> Result<Vec<StopRecord>> {
        read_objects(&mut self.file_handler, "stops.txt", true)
    }
    fn stop_times(&mut self) -> Result<Vec<StopTimeRecord>> {
        read_objects(&mut self.file_handler, "stop_times.txt", true)
    }
}
