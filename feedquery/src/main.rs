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

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    layer::SubscriberExt as _,
    util::SubscriberInitExt as _,
};
use transit_feed::{
    configuration::read_config,
    objects::{IdxSet, RouteType, Stop},
    Feed, Reader,
};
use typed_index_collection::Idx;

#[derive(Debug, Parser)]
#[clap(name = "feedquery", about = "Query stations and trips of a transit feed.", version)]
struct Opt {
    /// Input directory or zip archive of the feed.
    #[clap(short, long, parse(from_os_str))]
    input: PathBuf,

    /// JSON file containing additional configuration.
    #[clap(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Root stations served by the routes of a type.
    Stations {
        /// Route type, by name (`bus`, `subway`...) or by code.
        #[clap(short = 't', long)]
        route_type: RouteType,
    },
    /// A stop with its root station and its lowest children.
    Stop {
        /// Identifier of the stop.
        id: String,
    },
    /// Trips running on a date from a stop to another.
    Trips {
        /// Identifier of the departure stop.
        #[clap(long)]
        from: String,
        /// Identifier of the arrival stop.
        #[clap(long)]
        to: String,
        /// Date of travel, as YYYY-MM-DD.
        #[clap(short, long)]
        date: NaiveDate,
    },
}

fn stop_line(feed: &Feed, stop_idx: Idx<Stop>) -> String {
    let stop = &feed.stops[stop_idx];
    format!("{}\t{}", stop.id, stop.name.as_deref().unwrap_or_default())
}

fn find_stop(feed: &Feed, id: &str) -> Result<Idx<Stop>> {
    feed.stop_by_id(id)
        .ok_or_else(|| anyhow!("stop '{}' not found", id))
}

fn stations(feed: &Feed, route_type: RouteType) {
    let mut stations: Vec<Idx<Stop>> = feed
        .stations_by_route_type(route_type)
        .into_iter()
        .collect();
    stations.sort_by(|a, b| feed.stops[*a].id.cmp(&feed.stops[*b].id));
    info!("{} stations served by {} routes", stations.len(), route_type);
    for station in stations {
        println!("{}", stop_line(feed, station));
    }
}

fn stop(feed: &Feed, id: &str) {
    let stop_idx = match feed.stop_by_id(id) {
        Some(stop_idx) => stop_idx,
        None => {
            println!("stop '{}' not found", id);
            return;
        }
    };
    println!("stop\t{}", stop_line(feed, stop_idx));
    println!("root\t{}", stop_line(feed, feed.root_ancestor(stop_idx)));
    for child in feed.lowest_children(stop_idx) {
        println!("child\t{}", stop_line(feed, child));
    }
}

fn trips(feed: &Feed, from: &str, to: &str, date: NaiveDate) -> Result<()> {
    let from_idx = find_stop(feed, from)?;
    let to_idx = find_stop(feed, to)?;
    let origins: IdxSet<Stop> = feed.lowest_children(from_idx).into_iter().collect();
    let mut trips: Vec<_> = feed.trips_between(from_idx, to_idx, date).into_iter().collect();
    trips.sort_by(|a, b| feed.trips[*a].id.cmp(&feed.trips[*b].id));
    info!("{} trips from '{}' to '{}' on {}", trips.len(), from, to, date);
    for trip_idx in trips {
        let trip = &feed.trips[trip_idx];
        let departure = feed
            .trip_stop_time_at(trip_idx, &origins)
            .and_then(|stop_time| stop_time.departure_time.as_deref());
        println!(
            "{}\t{}\t{}\t{}",
            trip.id,
            feed.routes[trip.route]
                .short_name
                .as_deref()
                .unwrap_or_default(),
            trip.headsign.as_deref().unwrap_or_default(),
            departure.unwrap_or_default()
        );
    }
    Ok(())
}

fn run(opt: Opt) -> Result<()> {
    info!("Launching feedquery...");

    let configuration = read_config(opt.config)?;
    let feed = Reader::new(configuration).parse(opt.input)?;

    match opt.command {
        Command::Stations { route_type } => stations(&feed, route_type),
        Command::Stop { id } => stop(&feed, &id),
        Command::Trips { from, to, date } => trips(&feed, &from, &to, date)?,
    }
    Ok(())
}

fn init_logger() {
    let default_level = LevelFilter::INFO;
    let rust_log =
        std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| default_level.to_string());
    let env_filter_subscriber = EnvFilter::try_new(rust_log).unwrap_or_else(|e| {
        eprintln!(
            "invalid {}, falling back to level '{}' - {}",
            EnvFilter::DEFAULT_ENV,
            default_level,
            e,
        );
        EnvFilter::new(default_level.to_string())
    });
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(env_filter_subscriber)
        .init();
}

fn main() {
    init_logger();
    if let Err(err) = run(Opt::parse()) {
        for cause in err.chain() {
            eprintln!("{}", cause);
        }
        std::process::exit(1);
    }
}
