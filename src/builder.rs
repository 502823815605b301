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

//! Links the flat records of a feed into a [`Feed`].
//!
//! Records are consumed in a fixed order, each stage resolving identifiers
//! against the objects created by the previous ones:
//!
//! ```text
//!   routes -> calendars -> calendar dates -> trips -> stops -> stop times
//! ```
//!
//! The first missing reference or duplicated identifier aborts the whole
//! build and the collections under construction are dropped.

use crate::model::{Collections, Feed};
use crate::objects::*;
use crate::records::*;
use crate::{Error, Result};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::convert::TryFrom;
use tracing::{debug, info, warn};
use typed_index_collection::Idx;

/// Builds a [`Feed`] from a [`RecordSource`].
#[derive(Debug, Default)]
pub struct FeedBuilder {
    collections: Collections,
}

impl FeedBuilder {
    /// An empty builder
    pub fn new() -> Self {
        FeedBuilder::default()
    }

    /// Free-form metadata carried into the feed
    pub fn feed_infos(mut self, feed_infos: BTreeMap<String, String>) -> Self {
        self.collections.feed_infos = feed_infos;
        self
    }

    /// Consumes all the records of the source and links them.
    pub fn build<S: RecordSource + ?Sized>(mut self, source: &mut S) -> Result<Feed> {
        self.manage_routes(source.routes()?)?;
        self.manage_calendars(source.calendars()?)?;
        self.manage_calendar_dates(source.calendar_dates()?)?;
        self.manage_trips(source.trips()?)?;
        self.manage_stops(source.stops()?)?;
        self.check_stop_hierarchy()?;
        self.manage_stop_times(source.stop_times()?)?;
        info!(
            "Feed linked: {} routes, {} trips, {} stops, {} stop times",
            self.collections.routes.len(),
            self.collections.trips.len(),
            self.collections.stops.len(),
            self.collections.stop_times.len()
        );
        Ok(Feed::new(self.collections))
    }

    fn manage_routes(&mut self, records: Vec<RouteRecord>) -> Result<()> {
        info!("Linking routes");
        for record in records {
            let route = Route {
                route_type: RouteType::try_from(record.route_type)?,
                id: record.route_id,
                short_name: record.route_short_name,
                long_name: record.route_long_name,
                color: record.route_color,
                trips: IdxSet::new(),
            };
            let id = route.id.clone();
            self.collections
                .routes
                .push(route)
                .map_err(|_| duplicate("route", id))?;
        }
        Ok(())
    }

    fn manage_calendars(&mut self, records: Vec<CalendarRecord>) -> Result<()> {
        info!("Linking calendars");
        for record in records {
            let calendar = ServiceCalendar {
                id: record.service_id,
                monday: record.monday,
                tuesday: record.tuesday,
                wednesday: record.wednesday,
                thursday: record.thursday,
                friday: record.friday,
                saturday: record.saturday,
                sunday: record.sunday,
                start_date: record.start_date,
                end_date: record.end_date,
            };
            let id = calendar.id.clone();
            self.collections
                .calendars
                .push(calendar)
                .map_err(|_| duplicate("service calendar", id))?;
        }
        Ok(())
    }

    fn manage_calendar_dates(&mut self, records: Vec<CalendarDateRecord>) -> Result<()> {
        info!("Linking calendar dates");
        for record in records {
            let exception_type = ExceptionType::try_from(record.exception_type)?;
            let exceptions_idx = match self
                .collections
                .calendar_exceptions
                .get_idx(&record.service_id)
            {
                Some(idx) => idx,
                None => self
                    .collections
                    .calendar_exceptions
                    .push(ServiceCalendarExceptions::new(record.service_id.clone()))
                    .map_err(|_| duplicate("calendar exceptions", record.service_id.clone()))?,
            };
            let mut exceptions = self
                .collections
                .calendar_exceptions
                .index_mut(exceptions_idx);
            match exceptions.exceptions.entry(record.date) {
                Entry::Occupied(_) => {
                    return Err(duplicate(
                        "calendar exception",
                        format!("{}:{}", record.service_id, record.date.format("%Y%m%d")),
                    ));
                }
                Entry::Vacant(entry) => {
                    entry.insert(exception_type);
                }
            }
        }
        Ok(())
    }

    fn manage_trips(&mut self, records: Vec<TripRecord>) -> Result<()> {
        info!("Linking trips");
        let collections = &mut self.collections;
        for record in records {
            let route_idx = collections.routes.get_idx(&record.route_id).ok_or_else(|| {
                Error::MissingReference {
                    object: "route",
                    id: record.route_id.clone(),
                    referenced_by: format!("trip '{}'", record.trip_id),
                }
            })?;
            // an unknown service only means the trip has no calendar data
            let calendar = collections.calendars.get_idx(&record.service_id);
            let calendar_exceptions = collections.calendar_exceptions.get_idx(&record.service_id);
            if calendar.is_none() && calendar_exceptions.is_none() {
                warn!(
                    "trip '{}' has neither calendar nor calendar dates for service '{}'",
                    record.trip_id, record.service_id
                );
            }
            let trip = Trip {
                id: record.trip_id,
                route: route_idx,
                service_id: record.service_id,
                calendar,
                calendar_exceptions,
                headsign: record.trip_headsign,
                direction: record.direction_id,
                stops: IdxSet::new(),
                stop_times: IdxSet::new(),
            };
            let id = trip.id.clone();
            let trip_idx = collections
                .trips
                .push(trip)
                .map_err(|_| duplicate("trip", id))?;
            collections.routes.index_mut(route_idx).trips.insert(trip_idx);
        }
        Ok(())
    }

    fn manage_stops(&mut self, records: Vec<StopRecord>) -> Result<()> {
        info!("Linking stops");
        let stops = &mut self.collections.stops;
        let mut parent_ids: Vec<(Idx<Stop>, String)> = Vec::new();
        for record in records {
            let stop = Stop {
                id: record.stop_id,
                code: record.stop_code,
                name: record.stop_name,
                lat: record.stop_lat,
                lon: record.stop_lon,
                location_type: record.location_type,
                platform_code: record.platform_code,
                parent: None,
                children: IdxSet::new(),
                trips: IdxSet::new(),
                stop_times: IdxSet::new(),
            };
            let id = stop.id.clone();
            let stop_idx = stops.push(stop).map_err(|_| duplicate("stop", id))?;
            if let Some(parent_id) = record.parent_station {
                parent_ids.push((stop_idx, parent_id));
            }
        }
        // parents can be declared after their children, resolve them once all stops exist
        for (stop_idx, parent_id) in parent_ids {
            let parent_idx = stops
                .get_idx(&parent_id)
                .ok_or_else(|| Error::MissingReference {
                    object: "stop",
                    id: parent_id.clone(),
                    referenced_by: format!("stop '{}'", stops[stop_idx].id),
                })?;
            debug!("stop '{}' is a child of '{}'", stops[stop_idx].id, parent_id);
            stops.index_mut(stop_idx).parent = Some(parent_idx);
            stops.index_mut(parent_idx).children.insert(stop_idx);
        }
        Ok(())
    }

    // Each stop is walked once: a chain stops at the first stop already
    // known to reach a root.
    fn check_stop_hierarchy(&self) -> Result<()> {
        let stops = &self.collections.stops;
        let mut reaching_root = IdxSet::<Stop>::new();
        for (stop_idx, stop) in stops.iter() {
            if reaching_root.contains(&stop_idx) {
                continue;
            }
            let mut chain = vec![stop_idx];
            let mut current = stop_idx;
            while let Some(parent) = stops[current].parent {
                if reaching_root.contains(&parent) {
                    break;
                }
                // A chain of parents longer than the number of stops necessarily loops.
                if chain.len() > stops.len() {
                    return Err(Error::CyclicStopHierarchy(stop.id.clone()));
                }
                chain.push(parent);
                current = parent;
            }
            reaching_root.extend(chain);
        }
        Ok(())
    }

    fn manage_stop_times(&mut self, records: Vec<StopTimeRecord>) -> Result<()> {
        info!("Linking stop times");
        let collections = &mut self.collections;
        for record in records {
            let referenced_by = || {
                format!(
                    "stop time (trip '{}', stop_sequence {})",
                    record.trip_id, record.stop_sequence
                )
            };
            let trip_idx = collections.trips.get_idx(&record.trip_id).ok_or_else(|| {
                Error::MissingReference {
                    object: "trip",
                    id: record.trip_id.clone(),
                    referenced_by: referenced_by(),
                }
            })?;
            let stop_idx = collections.stops.get_idx(&record.stop_id).ok_or_else(|| {
                Error::MissingReference {
                    object: "stop",
                    id: record.stop_id.clone(),
                    referenced_by: referenced_by(),
                }
            })?;
            let stop_time = StopTime {
                trip: trip_idx,
                stop: stop_idx,
                arrival_time: record.arrival_time,
                departure_time: record.departure_time,
                sequence: record.stop_sequence,
                pickup_type: PickupDropOffType::try_from(record.pickup_type.unwrap_or_default())?,
                drop_off_type: PickupDropOffType::try_from(
                    record.drop_off_type.unwrap_or_default(),
                )?,
            };
            let stop_time_idx = collections.stop_times.push(stop_time);
            {
                let mut trip = collections.trips.index_mut(trip_idx);
                trip.stop_times.insert(stop_time_idx);
                trip.stops.insert(stop_idx);
            }
            let mut stop = collections.stops.index_mut(stop_idx);
            stop.stop_times.insert(stop_time_idx);
            stop.trips.insert(trip_idx);
        }
        Ok(())
    }
}

fn duplicate(object: &'static str, id: String) -> Error {
    Error::DuplicateKey { object, id }
}
