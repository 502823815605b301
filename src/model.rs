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

//! Definition of the linked transit feed.

use crate::objects::*;
use derivative::Derivative;
use std::collections::BTreeMap;
use std::ops;
use typed_index_collection::{Collection, CollectionWithId, Idx};

/// The set of collections representing the feed.
///
/// Only the [`FeedBuilder`](crate::FeedBuilder) mutates it; once wrapped in a
/// [`Feed`] it is read only.
#[derive(Derivative, Debug)]
#[derivative(Default)]
#[allow(missing_docs)]
pub struct Collections {
    pub routes: CollectionWithId<Route>,
    pub trips: CollectionWithId<Trip>,
    pub stops: CollectionWithId<Stop>,
    pub stop_times: Collection<StopTime>,
    pub calendars: CollectionWithId<ServiceCalendar>,
    pub calendar_exceptions: CollectionWithId<ServiceCalendarExceptions>,
    pub feed_infos: BTreeMap<String, String>,
}

/// A fully linked, immutable transit feed.
///
/// Dereferences to its [`Collections`]; every query of the crate is a method
/// of this type.
#[derive(Debug)]
pub struct Feed {
    collections: Collections,
}

impl Feed {
    pub(crate) fn new(collections: Collections) -> Self {
        Feed { collections }
    }

    /// Consumes the feed to give back its collections.
    pub fn into_collections(self) -> Collections {
        self.collections
    }

    /// Stop times of a trip, ordered by sequence.
    pub fn stop_times_of(&self, trip_idx: Idx<Trip>) -> Vec<&StopTime> {
        let mut stop_times: Vec<&StopTime> = self.trips[trip_idx]
            .stop_times
            .iter()
            .map(|st_idx| &self.stop_times[*st_idx])
            .collect();
        stop_times.sort_by_key(|st| st.sequence);
        stop_times
    }
}

impl ops::Deref for Feed {
    type Target = Collections;
    fn deref(&self) -> &Self::Target {
        &self.collections
    }
}
