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

use approx::assert_relative_eq;
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use transit_feed::objects::{ExceptionType, PickupDropOffType, RouteType};
use transit_feed::test_utils::*;
use transit_feed::{Configuration, Error, Reader};

const FEED: &str = "tests/fixtures/feed";

// copies the fixture feed to `dir` with one file replaced or removed
fn altered_feed(dir: &Path, file_name: &str, content: Option<&str>) {
    for entry in fs::read_dir(FEED).unwrap() {
        let entry = entry.unwrap();
        fs::copy(entry.path(), dir.join(entry.file_name())).unwrap();
    }
    match content {
        Some(content) => {
            create_file_with_content(dir, file_name, content);
        }
        None => fs::remove_file(dir.join(file_name)).unwrap(),
    }
}

#[test]
fn simple_feed_reading() {
    let feed = transit_feed::read(FEED).unwrap();
    assert_eq!(feed.routes.len(), 3);
    assert_eq!(feed.trips.len(), 6);
    assert_eq!(feed.stops.len(), 9);
    assert_eq!(feed.stop_times.len(), 16);
    assert_eq!(feed.calendars.len(), 2);
    assert_eq!(feed.calendar_exceptions.len(), 3);

    let m1 = feed.routes.get("M1").unwrap();
    assert_eq!(m1.route_type, RouteType::Subway);
    assert_eq!(m1.short_name.as_deref(), Some("1"));
    assert_eq!(m1.color.as_deref(), Some("FFCD00"));
    assert_eq!(m1.trips.len(), 3);
    // blank optional fields are absent
    assert_eq!(feed.routes.get("B42").unwrap().color, None);

    let nat = feed.stops.get("NAT").unwrap();
    assert_eq!(nat.code.as_deref(), Some("NAT01"));
    assert_relative_eq!(nat.lat, 48.848);
    assert_relative_eq!(nat.lon, 2.396);
    assert_eq!(nat.parent, None);
    assert_eq!(nat.trips.len(), 4);
}

#[test]
fn ziped_feed_reading() {
    let feed = transit_feed::read("tests/fixtures/feed.zip").unwrap();
    assert_eq!(feed.stops.len(), 9);
    assert_eq!(feed.stop_times.len(), 16);
}

#[test]
fn stop_hierarchy_is_linked() {
    let feed = transit_feed::read(FEED).unwrap();
    let gdl = feed.stops.get_idx("GDL").unwrap();
    let children: Vec<&str> = feed.stops[gdl]
        .children
        .iter()
        .map(|child| feed.stops[*child].id.as_str())
        .collect();
    assert_eq!(children, vec!["GDL:1", "GDL:2", "B_GDL"]);
    let platform = feed.stops.get("GDL:2").unwrap();
    assert_eq!(platform.parent, Some(gdl));
    assert_eq!(platform.platform_code.as_deref(), Some("2"));
    assert_eq!(platform.location_type.as_deref(), Some("0"));
}

#[test]
fn stop_times_are_decoded() {
    let feed = transit_feed::read(FEED).unwrap();
    let m1_1 = feed.trips.get_idx("M1_1").unwrap();
    let stop_times = feed.stop_times_of(m1_1);
    assert_eq!(stop_times.len(), 3);
    assert_eq!(stop_times[0].pickup_type, PickupDropOffType::RegularlyScheduled);
    assert_eq!(stop_times[0].drop_off_type, PickupDropOffType::NotAvailable);
    assert_eq!(stop_times[1].arrival_time.as_deref(), Some("08:03:00"));
    assert_eq!(stop_times[1].departure_time.as_deref(), Some("08:03:30"));

    // times past midnight are kept as given
    let tr_1 = feed.trips.get_idx("TR_1").unwrap();
    assert_eq!(
        feed.stop_times_of(tr_1)[0].departure_time.as_deref(),
        Some("25:10:00")
    );
}

#[test]
fn calendars_are_linked() {
    let feed = transit_feed::read(FEED).unwrap();
    let m1_1 = feed.trips.get("M1_1").unwrap();
    assert_eq!(m1_1.service_id, "WEEK");
    assert!(m1_1.calendar.is_some());
    let exceptions = &feed.calendar_exceptions[m1_1.calendar_exceptions.unwrap()];
    assert_eq!(
        exceptions.exception_on(chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()),
        Some(ExceptionType::Removed)
    );

    let b42_1 = feed.trips.get("B42_1").unwrap();
    assert_eq!(b42_1.calendar, None);
    assert!(b42_1.calendar_exceptions.is_some());

    let tr_1 = feed.trips.get("TR_1").unwrap();
    assert_eq!(tr_1.service_id, "NOSERVICE");
    assert_eq!(tr_1.calendar, None);
    assert_eq!(tr_1.calendar_exceptions, None);
}

#[test]
fn feed_with_config_reading() {
    let mut feed_infos = BTreeMap::new();
    feed_infos.insert("feed_publisher_name".to_string(), "Hove".to_string());
    let configuration = Configuration {
        feed_infos: feed_infos.clone(),
    };
    let feed = Reader::new(configuration).parse(FEED).unwrap();
    // we should find our custom feed info in the loaded feed
    assert_eq!(feed.feed_infos, feed_infos);
}

#[test]
fn feed_with_config_file_reading() {
    let configuration =
        transit_feed::configuration::read_config(Some("tests/fixtures/config/config.json"))
            .unwrap();
    let feed = Reader::new(configuration).parse(FEED).unwrap();
    assert_eq!(feed.feed_infos["feed_license"], "ODbL");
}

#[test]
fn unexistent_file() {
    let err = transit_feed::read("tests/fixtures/i_m_not_here").unwrap_err();
    assert!(matches!(err, Error::NotFileNorDirectory(_)));
}

#[test]
fn file_not_a_feed() {
    // reading a file that is not a zip archive
    let err = transit_feed::read("tests/fixtures/feed/stops.txt").unwrap_err();
    assert!(matches!(err, Error::Zip(_)));
}

#[test]
fn missing_required_file() {
    test_in_tmp_dir(|path| {
        altered_feed(path, "stops.txt", None);
        let err = transit_feed::read(path).unwrap_err();
        assert_eq!(err.to_string(), "file 'stops.txt' not found");
    });
}

#[test]
fn missing_calendar_dates_file() {
    test_in_tmp_dir(|path| {
        altered_feed(path, "calendar_dates.txt", None);
        let feed = transit_feed::read(path).unwrap();
        assert!(feed.calendar_exceptions.is_empty());
        // SPECIAL was only defined by its exceptions
        assert_eq!(feed.trips.get("B42_1").unwrap().calendar_exceptions, None);
    });
}

#[test]
fn trip_with_unknown_route() {
    test_in_tmp_dir(|path| {
        altered_feed(
            path,
            "trips.txt",
            Some("route_id,service_id,trip_id\nM1,WEEK,M1_1\nM2,WEEK,M2_1\n"),
        );
        let err = transit_feed::read(path).unwrap_err();
        assert_eq!(
            err.to_string(),
            "trip 'M2_1' references unknown route 'M2'"
        );
    });
}

#[test]
fn stop_time_with_unknown_stop() {
    test_in_tmp_dir(|path| {
        altered_feed(
            path,
            "stop_times.txt",
            Some(
                "trip_id,arrival_time,departure_time,stop_id,stop_sequence\n\
                 M1_1,08:00:00,08:00:00,GDL:1,1\n\
                 M1_1,08:07:00,08:07:00,VIN,2\n",
            ),
        );
        let err = transit_feed::read(path).unwrap_err();
        assert_eq!(
            err.to_string(),
            "stop time (trip 'M1_1', stop_sequence 2) references unknown stop 'VIN'"
        );
    });
}

#[test]
fn duplicated_stop() {
    test_in_tmp_dir(|path| {
        altered_feed(
            path,
            "stops.txt",
            Some("stop_id,stop_name,stop_lat,stop_lon\nNAT,Nation,48.848,2.396\nNAT,Nation,48.848,2.396\n"),
        );
        let err = transit_feed::read(path).unwrap_err();
        assert!(matches!(err, Error::DuplicateKey { object: "stop", id } if id == "NAT"));
    });
}

#[test]
fn invalid_date() {
    test_in_tmp_dir(|path| {
        altered_feed(
            path,
            "calendar_dates.txt",
            Some("service_id,date,exception_type\nWEEK,2024-05-01,2\n"),
        );
        let err = transit_feed::read(path).unwrap_err();
        assert!(
            matches!(err, Error::InvalidFieldFormat { ref file_name, .. } if file_name == "calendar_dates.txt")
        );
    });
}

#[test]
fn invalid_exception_type() {
    test_in_tmp_dir(|path| {
        altered_feed(
            path,
            "calendar_dates.txt",
            Some("service_id,date,exception_type\nWEEK,20240501,3\n"),
        );
        let err = transit_feed::read(path).unwrap_err();
        assert!(matches!(err, Error::InvalidEnumValue { code: 3, .. }));
    });
}

#[test]
fn invalid_pickup_type() {
    test_in_tmp_dir(|path| {
        altered_feed(
            path,
            "stop_times.txt",
            Some(
                "trip_id,arrival_time,departure_time,stop_id,stop_sequence,pickup_type\n\
                 M1_1,08:00:00,08:00:00,GDL:1,1,4\n",
            ),
        );
        let err = transit_feed::read(path).unwrap_err();
        assert!(matches!(err, Error::InvalidEnumValue { code: 4, .. }));
    });
}

#[test]
fn negative_exception_type() {
    test_in_tmp_dir(|path| {
        altered_feed(
            path,
            "calendar_dates.txt",
            Some("service_id,date,exception_type\nWEEK,20240501,-1\n"),
        );
        let err = transit_feed::read(path).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidEnumValue {
                enumeration: "exception_type",
                code: -1
            }
        ));
    });
}

#[test]
fn route_type_out_of_range() {
    test_in_tmp_dir(|path| {
        altered_feed(
            path,
            "routes.txt",
            Some("route_id,route_type\nM1,70000\n"),
        );
        let err = transit_feed::read(path).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidEnumValue {
                enumeration: "route_type",
                code: 70000
            }
        ));
    });
}

#[test]
fn drop_off_type_out_of_range() {
    test_in_tmp_dir(|path| {
        altered_feed(
            path,
            "stop_times.txt",
            Some(
                "trip_id,arrival_time,departure_time,stop_id,stop_sequence,drop_off_type\n\
                 M1_1,08:00:00,08:00:00,GDL:1,1,256\n",
            ),
        );
        let err = transit_feed::read(path).unwrap_err();
        assert!(matches!(err, Error::InvalidEnumValue { code: 256, .. }));
    });
}
