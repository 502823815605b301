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

//! Queries on a linked [`Feed`].
//!
//! The stop hierarchy is checked to be acyclic when the feed is built, so
//! walking it up or down always terminates.

use crate::model::Feed;
use crate::objects::*;
use tracing::debug;
use typed_index_collection::Idx;

impl Feed {
    /// Looks a stop up by its identifier.
    pub fn stop_by_id(&self, id: &str) -> Option<Idx<Stop>> {
        self.stops.get_idx(id)
    }

    /// The stop at the top of the hierarchy of `stop_idx`, which is
    /// `stop_idx` itself when it has no parent.
    pub fn root_ancestor(&self, stop_idx: Idx<Stop>) -> Idx<Stop> {
        let mut current = stop_idx;
        while let Some(parent) = self.stops[current].parent {
            current = parent;
        }
        current
    }

    /// The leaves of the hierarchy under `stop_idx`, or `stop_idx` alone if
    /// it has no children.
    ///
    /// Children are visited in index order, so the result is stable for a
    /// given feed.
    pub fn lowest_children(&self, stop_idx: Idx<Stop>) -> Vec<Idx<Stop>> {
        let mut leaves = Vec::new();
        self.collect_lowest_children(stop_idx, &mut leaves);
        leaves
    }

    fn collect_lowest_children(&self, stop_idx: Idx<Stop>, leaves: &mut Vec<Idx<Stop>>) {
        let children = &self.stops[stop_idx].children;
        if children.is_empty() {
            leaves.push(stop_idx);
        } else {
            for child in children {
                self.collect_lowest_children(*child, leaves);
            }
        }
    }

    /// Root stations of all the stops served by a route of the given type.
    pub fn stations_by_route_type(&self, route_type: RouteType) -> IdxSet<Stop> {
        self.routes
            .values()
            .filter(|route| route.route_type == route_type)
            .flat_map(|route| route.trips.iter())
            .flat_map(|trip_idx| self.trips[*trip_idx].stops.iter())
            .map(|stop_idx| self.root_ancestor(*stop_idx))
            .collect()
    }

    /// The stop time of the trip at one of `stops` with the lowest sequence.
    pub fn trip_stop_time_at(&self, trip_idx: Idx<Trip>, stops: &IdxSet<Stop>) -> Option<&StopTime> {
        self.trips[trip_idx]
            .stop_times
            .iter()
            .map(|st_idx| &self.stop_times[*st_idx])
            .filter(|stop_time| stops.contains(&stop_time.stop))
            .min_by_key(|stop_time| stop_time.sequence)
    }

    /// Trips running on `date` that serve `from` and later serve `to`,
    /// `from` and `to` being expanded to their lowest children.
    pub fn trips_between(&self, from: Idx<Stop>, to: Idx<Stop>, date: Date) -> IdxSet<Trip> {
        let from_stops: IdxSet<Stop> = self.lowest_children(from).into_iter().collect();
        let to_stops: IdxSet<Stop> = self.lowest_children(to).into_iter().collect();
        let trips_at = |stops: &IdxSet<Stop>| -> IdxSet<Trip> {
            stops
                .iter()
                .flat_map(|stop_idx| self.stops[*stop_idx].trips.iter().copied())
                .collect()
        };
        let from_trips = trips_at(&from_stops);
        let to_trips = trips_at(&to_stops);

        from_trips
            .intersection(&to_trips)
            .copied()
            .filter(|trip_idx| {
                match (
                    self.trip_stop_time_at(*trip_idx, &from_stops),
                    self.trip_stop_time_at(*trip_idx, &to_stops),
                ) {
                    (Some(departure), Some(arrival)) => departure.sequence < arrival.sequence,
                    _ => false,
                }
            })
            .filter(|trip_idx| self.trip_runs_on_date(*trip_idx, date))
            .collect()
    }

    /// Whether the trip runs on `date`.
    ///
    /// A date exception wins over the weekly calendar. A trip with neither
    /// is considered running every day.
    pub fn trip_runs_on_date(&self, trip_idx: Idx<Trip>, date: Date) -> bool {
        let trip = &self.trips[trip_idx];
        let exception = trip
            .calendar_exceptions
            .and_then(|idx| self.calendar_exceptions[idx].exception_on(date));
        if let Some(exception) = exception {
            return exception == ExceptionType::Added;
        }
        match trip.calendar {
            Some(calendar_idx) => self.calendars[calendar_idx].runs_on(date),
            None => {
                debug!("trip '{}' has no calendar for {}, considered running", trip.id, date);
                true
            }
        }
    }
}
