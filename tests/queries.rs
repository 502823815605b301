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

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use transit_feed::objects::{IdxSet, RouteType, Stop};
use transit_feed::Feed;

fn feed() -> Feed {
    transit_feed::read("tests/fixtures/feed").unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn stations(feed: &Feed, route_type: RouteType) -> Vec<&str> {
    let mut ids: Vec<&str> = feed
        .stations_by_route_type(route_type)
        .into_iter()
        .map(|stop_idx| feed.stops[stop_idx].id.as_str())
        .collect();
    ids.sort_unstable();
    ids
}

fn trips(feed: &Feed, from: &str, to: &str, date: NaiveDate) -> Vec<String> {
    let from = feed.stop_by_id(from).unwrap();
    let to = feed.stop_by_id(to).unwrap();
    let mut ids: Vec<String> = feed
        .trips_between(from, to, date)
        .into_iter()
        .map(|trip_idx| feed.trips[trip_idx].id.clone())
        .collect();
    ids.sort_unstable();
    ids
}

#[test]
fn stations_by_route_type() {
    let feed = feed();
    assert_eq!(stations(&feed, RouteType::Subway), vec!["BAS", "GDL", "NAT"]);
    assert_eq!(stations(&feed, RouteType::Bus), vec!["B_REP", "GDL"]);
    assert_eq!(stations(&feed, RouteType::Tram), vec!["B_REP", "NAT"]);
    assert!(stations(&feed, RouteType::Ferry).is_empty());
}

#[test]
fn hierarchy_of_a_platform() {
    let feed = feed();
    let platform = feed.stop_by_id("BAS:2").unwrap();
    let bas = feed.stop_by_id("BAS").unwrap();
    assert_eq!(feed.root_ancestor(platform), bas);
    assert_eq!(feed.lowest_children(platform), vec![platform]);
    let children: Vec<&str> = feed
        .lowest_children(bas)
        .into_iter()
        .map(|stop_idx| feed.stops[stop_idx].id.as_str())
        .collect();
    assert_eq!(children, vec!["BAS:1", "BAS:2"]);
    assert_eq!(feed.stop_by_id("VIN"), None);
}

#[test]
fn trips_on_weekdays_and_weekends() {
    let feed = feed();
    // monday
    assert_eq!(trips(&feed, "GDL", "NAT", date(2024, 3, 4)), vec!["M1_1"]);
    assert_eq!(trips(&feed, "NAT", "GDL", date(2024, 3, 4)), vec!["M1_2"]);
    // saturday
    assert_eq!(trips(&feed, "GDL", "NAT", date(2024, 3, 9)), vec!["M1_3"]);
    assert!(trips(&feed, "NAT", "GDL", date(2024, 3, 9)).is_empty());
    // after the end of the calendars
    assert!(trips(&feed, "GDL", "NAT", date(2025, 3, 4)).is_empty());
}

#[test]
fn trips_between_platforms() {
    let feed = feed();
    assert_eq!(trips(&feed, "GDL:1", "BAS:1", date(2024, 3, 4)), vec!["M1_1"]);
    // M1_1 does not call at this platform
    assert!(trips(&feed, "GDL:2", "BAS", date(2024, 3, 4)).is_empty());
}

#[test]
fn trips_with_calendar_exceptions() {
    let feed = feed();
    // a wednesday, removed from WEEK and added to WEEKEND
    assert_eq!(trips(&feed, "GDL", "BAS", date(2024, 5, 1)), vec!["M1_3"]);
    // SPECIAL has no calendar, only an added date
    assert_eq!(trips(&feed, "GDL", "B_REP", date(2024, 7, 14)), vec!["B42_1"]);
}

#[test]
fn trip_with_only_exceptions_runs_on_other_dates() {
    let feed = feed();
    let b42_1 = feed.trips.get_idx("B42_1").unwrap();
    assert!(feed.trip_runs_on_date(b42_1, date(2024, 3, 4)));
    // B42_2 loops on B_REP, its first passage there is before GDL
    assert_eq!(trips(&feed, "GDL", "B_REP", date(2024, 3, 4)), vec!["B42_1"]);
    assert_eq!(trips(&feed, "B_REP", "GDL", date(2024, 3, 4)), vec!["B42_2"]);
}

#[test]
fn trip_without_service_runs_every_day() {
    let feed = feed();
    let tr_1 = feed.trips.get_idx("TR_1").unwrap();
    assert!(feed.trip_runs_on_date(tr_1, date(2024, 3, 4)));
    assert!(feed.trip_runs_on_date(tr_1, date(1970, 1, 1)));
    assert_eq!(trips(&feed, "NAT", "B_REP", date(2030, 1, 1)), vec!["TR_1"]);
}

#[test]
fn departure_at_origin() {
    let feed = feed();
    let m1_2 = feed.trips.get_idx("M1_2").unwrap();
    let bas = feed.stop_by_id("BAS").unwrap();
    let origins: IdxSet<Stop> = feed.lowest_children(bas).into_iter().collect();
    let stop_time = feed.trip_stop_time_at(m1_2, &origins).unwrap();
    assert_eq!(stop_time.sequence, 2);
    assert_eq!(stop_time.departure_time.as_deref(), Some("09:04:30"));
}
