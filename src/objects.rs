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

//! The different objects contained in the transit feed.
//!
//! Objects reference each other through typed indices (`Idx<T>`) into the
//! collections of a [`Feed`](crate::Feed), never through owning pointers, so
//! the naturally cyclic graph (stop <-> trip, stop parent <-> children) needs
//! no reference counting.

use crate::{Error, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::{BTreeMap, BTreeSet};
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;
use typed_index_collection::{Id, Idx};

/// A calendar date, without time component
pub type Date = NaiveDate;

/// A set of typed indices
pub type IdxSet<T> = BTreeSet<Idx<T>>;

macro_rules! impl_id {
    ($ty:ty) => {
        impl Id<$ty> for $ty {
            fn id(&self) -> &str {
                &self.id
            }
            fn set_id(&mut self, id: String) {
                self.id = id;
            }
        }
    };
}

/// Mode of transportation of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RouteType {
    /// Tram, streetcar, light rail
    Tram,
    /// Subway, metro
    Subway,
    /// Intercity or long-distance rail
    Rail,
    /// Short and long distance bus
    Bus,
    /// Boat service
    Ferry,
    /// Street-level rail cars pulled by a cable
    CableCar,
    /// Aerial lift, suspended cable car
    Gondola,
    /// Rail system designed for steep inclines
    Funicular,
}

impl TryFrom<i64> for RouteType {
    type Error = Error;
    fn try_from(code: i64) -> Result<Self> {
        let route_type = match code {
            0 => RouteType::Tram,
            1 => RouteType::Subway,
            2 => RouteType::Rail,
            3 => RouteType::Bus,
            4 => RouteType::Ferry,
            5 => RouteType::CableCar,
            6 => RouteType::Gondola,
            7 => RouteType::Funicular,
            _ => {
                return Err(Error::InvalidEnumValue {
                    enumeration: "route_type",
                    code,
                })
            }
        };
        Ok(route_type)
    }
}

impl FromStr for RouteType {
    type Err = String;
    /// Accepts the numeric code or the (case insensitive) variant name.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if let Ok(code) = s.parse::<i64>() {
            return RouteType::try_from(code).map_err(|e| e.to_string());
        }
        match s.to_lowercase().as_str() {
            "tram" => Ok(RouteType::Tram),
            "subway" => Ok(RouteType::Subway),
            "rail" => Ok(RouteType::Rail),
            "bus" => Ok(RouteType::Bus),
            "ferry" => Ok(RouteType::Ferry),
            "cablecar" => Ok(RouteType::CableCar),
            "gondola" => Ok(RouteType::Gondola),
            "funicular" => Ok(RouteType::Funicular),
            _ => Err(format!("'{}' is not a valid route type", s)),
        }
    }
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Whether passengers can board or alight at a stop time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickupDropOffType {
    /// Regularly scheduled pickup or drop off
    RegularlyScheduled,
    /// No pickup or drop off available
    NotAvailable,
    /// Must phone agency to arrange
    PhoneAgency,
    /// Must coordinate with driver to arrange
    CoordinateWithDriver,
}

impl Default for PickupDropOffType {
    fn default() -> Self {
        PickupDropOffType::RegularlyScheduled
    }
}

impl TryFrom<i64> for PickupDropOffType {
    type Error = Error;
    fn try_from(code: i64) -> Result<Self> {
        match code {
            0 => Ok(PickupDropOffType::RegularlyScheduled),
            1 => Ok(PickupDropOffType::NotAvailable),
            2 => Ok(PickupDropOffType::PhoneAgency),
            3 => Ok(PickupDropOffType::CoordinateWithDriver),
            _ => Err(Error::InvalidEnumValue {
                enumeration: "pickup/drop off type",
                code,
            }),
        }
    }
}

/// Kind of a calendar exception
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExceptionType {
    /// The service is added for the date
    Added,
    /// The service is removed for the date
    Removed,
}

impl TryFrom<i64> for ExceptionType {
    type Error = Error;
    fn try_from(code: i64) -> Result<Self> {
        match code {
            1 => Ok(ExceptionType::Added),
            2 => Ok(ExceptionType::Removed),
            _ => Err(Error::InvalidEnumValue {
                enumeration: "exception_type",
                code,
            }),
        }
    }
}

/// A route, grouping trips displayed to riders as a single service
#[derive(Debug, PartialEq)]
pub struct Route {
    /// Identifier of the route
    pub id: String,
    /// Short name, like "32"
    pub short_name: Option<String>,
    /// Full name
    pub long_name: Option<String>,
    /// Mode of transportation
    pub route_type: RouteType,
    /// Color as given in the feed
    pub color: Option<String>,
    /// Trips of the route
    pub trips: IdxSet<Trip>,
}
impl_id!(Route);

/// A trip: a sequence of stops served by a vehicle on some dates
#[derive(Debug, PartialEq)]
pub struct Trip {
    /// Identifier of the trip
    pub id: String,
    /// The route of the trip
    pub route: Idx<Route>,
    /// Service identifier as given in the feed
    pub service_id: String,
    /// Weekly calendar, if the service has one
    pub calendar: Option<Idx<ServiceCalendar>>,
    /// Date exceptions, if the service has some
    pub calendar_exceptions: Option<Idx<ServiceCalendarExceptions>>,
    /// Text displayed to riders to identify the destination
    pub headsign: Option<String>,
    /// Direction of travel, kept as an opaque token
    pub direction: Option<String>,
    /// Stops visited by the trip
    pub stops: IdxSet<Stop>,
    /// Stop times of the trip
    pub stop_times: IdxSet<StopTime>,
}
impl_id!(Trip);

/// A stop, a platform or a station
#[derive(Debug, PartialEq)]
pub struct Stop {
    /// Identifier of the stop
    pub id: String,
    /// Short code displayed to riders
    pub code: Option<String>,
    /// Name of the stop
    pub name: Option<String>,
    /// WGS84 latitude
    pub lat: f64,
    /// WGS84 longitude
    pub lon: f64,
    /// Location type, kept as an opaque token
    pub location_type: Option<String>,
    /// Platform identifier inside the parent station
    pub platform_code: Option<String>,
    /// The parent station
    pub parent: Option<Idx<Stop>>,
    /// Stops having this stop as parent
    pub children: IdxSet<Stop>,
    /// Trips serving this stop
    pub trips: IdxSet<Trip>,
    /// Stop times at this stop
    pub stop_times: IdxSet<StopTime>,
}
impl_id!(Stop);

/// A passage of a trip at a stop
#[derive(Debug, PartialEq)]
pub struct StopTime {
    /// The trip
    pub trip: Idx<Trip>,
    /// The stop
    pub stop: Idx<Stop>,
    /// Arrival time token, not interpreted
    pub arrival_time: Option<String>,
    /// Departure time token, not interpreted
    pub departure_time: Option<String>,
    /// Order of the passage in the trip
    pub sequence: u32,
    /// Boarding conditions
    pub pickup_type: PickupDropOffType,
    /// Alighting conditions
    pub drop_off_type: PickupDropOffType,
}

/// Weekly pattern of a service over a date range
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCalendar {
    /// Service identifier
    pub id: String,
    /// Active on Mondays
    pub monday: bool,
    /// Active on Tuesdays
    pub tuesday: bool,
    /// Active on Wednesdays
    pub wednesday: bool,
    /// Active on Thursdays
    pub thursday: bool,
    /// Active on Fridays
    pub friday: bool,
    /// Active on Saturdays
    pub saturday: bool,
    /// Active on Sundays
    pub sunday: bool,
    /// First active date, inclusive
    pub start_date: Date,
    /// Last active date, inclusive
    pub end_date: Date,
}
impl_id!(ServiceCalendar);

impl ServiceCalendar {
    /// Whether the weekly pattern is active on this day of the week.
    pub fn runs_on_weekday(&self, weekday: Weekday) -> bool {
        match weekday {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    /// Whether the date is in the validity range and its weekday is active.
    pub fn runs_on(&self, date: Date) -> bool {
        self.start_date <= date && date <= self.end_date && self.runs_on_weekday(date.weekday())
    }
}

/// Date specific overrides of a service
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCalendarExceptions {
    /// Service identifier
    pub id: String,
    /// At most one exception per date
    pub exceptions: BTreeMap<Date, ExceptionType>,
}
impl_id!(ServiceCalendarExceptions);

impl ServiceCalendarExceptions {
    /// Creates an empty set of exceptions for a service.
    pub fn new(id: String) -> Self {
        ServiceCalendarExceptions {
            id,
            exceptions: BTreeMap::new(),
        }
    }

    /// The exception declared for this date, if any.
    pub fn exception_on(&self, date: Date) -> Option<ExceptionType> {
        self.exceptions.get(&date).copied()
    }
}
