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

//! Helpers for tests: temporary directories and an easy way to create a
//! [`Feed`](crate::Feed).
//!
//! ```
//! use transit_feed::objects::RouteType;
//! use transit_feed::test_utils::RecordsBuilder;
//!
//! let feed = RecordsBuilder::default()
//!     .route("R1", RouteType::Bus)
//!     .stop("S0", None)
//!     .stop("S1", Some("S0"))
//!     .trip("T1", |t| {
//!         t.route("R1")
//!             .st("S1", 1, "10:00:00")
//!             .st("S2", 2, "10:10:00");
//!     })
//!     .build()
//!     .unwrap();
//! assert_eq!(feed.stops.len(), 3);
//! ```
#![allow(missing_docs)]

use crate::objects::{Date, ExceptionType, RouteType};
use crate::records::*;
use crate::{Feed, FeedBuilder, Result};
use chrono::Weekday;
use std::fs::File;
use std::io::prelude::*;
use std::path;

const DEFAULT_ROUTE: &str = "default_route";
const DEFAULT_SERVICE: &str = "default_service";

pub fn create_file_with_content(path: &path::Path, file_name: &str, content: &str) -> File {
    let file_path = path.join(file_name);
    let mut f = File::create(&file_path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    File::open(file_path).unwrap()
}

pub fn test_in_tmp_dir<F>(func: F)
where
    F: FnOnce(&path::Path),
{
    let tmp_dir = tempfile::tempdir().expect("create temp dir");
    {
        let path = tmp_dir.path();
        func(path);
    }
    tmp_dir.close().expect("delete temp dir");
}

/// Builder used to easily create feed records.
///
/// Routes and stops used by a trip but never declared are created on
/// [`into_records`](RecordsBuilder::into_records).
#[derive(Default)]
pub struct RecordsBuilder {
    records: FeedRecords,
}

/// Builder used to describe a trip and its stop times
pub struct TripBuilder<'a> {
    builder: &'a mut RecordsBuilder,
    trip_idx: usize,
}

impl RecordsBuilder {
    pub fn route(mut self, id: &str, route_type: RouteType) -> Self {
        self.records.routes.push(RouteRecord {
            route_id: id.to_string(),
            route_short_name: Some(id.to_string()),
            route_long_name: None,
            route_type: route_type as i64,
            route_color: None,
        });
        self
    }

    pub fn calendar(mut self, service_id: &str, days: &[Weekday], start: Date, end: Date) -> Self {
        self.records.calendars.push(CalendarRecord {
            service_id: service_id.to_string(),
            monday: days.contains(&Weekday::Mon),
            tuesday: days.contains(&Weekday::Tue),
            wednesday: days.contains(&Weekday::Wed),
            thursday: days.contains(&Weekday::Thu),
            friday: days.contains(&Weekday::Fri),
            saturday: days.contains(&Weekday::Sat),
            sunday: days.contains(&Weekday::Sun),
            start_date: start,
            end_date: end,
        });
        self
    }

    pub fn exception(mut self, service_id: &str, date: Date, exception_type: ExceptionType) -> Self {
        self.records.calendar_dates.push(CalendarDateRecord {
            service_id: service_id.to_string(),
            date,
            exception_type: match exception_type {
                ExceptionType::Added => 1,
                ExceptionType::Removed => 2,
            },
        });
        self
    }

    pub fn stop(mut self, id: &str, parent: Option<&str>) -> Self {
        self.records.stops.push(stop_record(id, parent));
        self
    }

    pub fn trip<F>(mut self, id: &str, trip_initer: F) -> Self
    where
        F: FnOnce(TripBuilder),
    {
        self.records.trips.push(TripRecord {
            trip_id: id.to_string(),
            route_id: DEFAULT_ROUTE.to_string(),
            service_id: DEFAULT_SERVICE.to_string(),
            trip_headsign: None,
            direction_id: None,
        });
        let trip_idx = self.records.trips.len() - 1;
        trip_initer(TripBuilder {
            builder: &mut self,
            trip_idx,
        });
        self
    }

    pub fn into_records(mut self) -> FeedRecords {
        let records = &mut self.records;
        for trip in &records.trips {
            if !records.routes.iter().any(|r| r.route_id == trip.route_id) {
                records.routes.push(RouteRecord {
                    route_id: trip.route_id.clone(),
                    route_short_name: None,
                    route_long_name: None,
                    route_type: RouteType::Bus as i64,
                    route_color: None,
                });
            }
        }
        for stop_time in &records.stop_times {
            if !records.stops.iter().any(|s| s.stop_id == stop_time.stop_id) {
                records.stops.push(stop_record(&stop_time.stop_id, None));
            }
        }
        self.records
    }

    pub fn build(self) -> Result<Feed> {
        FeedBuilder::new().build(&mut self.into_records())
    }
}

impl<'a> TripBuilder<'a> {
    fn trip(&mut self) -> &mut TripRecord {
        &mut self.builder.records.trips[self.trip_idx]
    }

    pub fn route(mut self, id: &str) -> Self {
        self.trip().route_id = id.to_string();
        self
    }

    pub fn service(mut self, id: &str) -> Self {
        self.trip().service_id = id.to_string();
        self
    }

    pub fn headsign(mut self, headsign: &str) -> Self {
        self.trip().trip_headsign = Some(headsign.to_string());
        self
    }

    pub fn st(mut self, stop_id: &str, sequence: u32, departure_time: &str) -> Self {
        let trip_id = self.trip().trip_id.clone();
        self.builder.records.stop_times.push(StopTimeRecord {
            trip_id,
            stop_id: stop_id.to_string(),
            arrival_time: Some(departure_time.to_string()),
            departure_time: Some(departure_time.to_string()),
            stop_sequence: sequence,
            pickup_type: None,
            drop_off_type: None,
        });
        self
    }
}

fn stop_record(id: &str, parent: Option<&str>) -> StopRecord {
    StopRecord {
        stop_id: id.to_string(),
        stop_code: None,
        stop_name: Some(id.to_string()),
        stop_lat: 0.,
        stop_lon: 0.,
        location_type: None,
        parent_station: parent.map(str::to_string),
        platform_code: None,
    }
}
