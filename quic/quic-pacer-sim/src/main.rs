// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use anyhow::{bail, Context};
use core::str::FromStr;
use quic_pacer_core::{
    recovery::{
        congestion_controller::{Endpoint as _, PathInfo},
        fixed_window, rogue, Bandwidth,
    },
    time::{clock::testing, Clock, Duration, StdClock},
};
use quic_pacer_sim::{Report, Timer, Transfer};
use structopt::StructOpt;

pub use anyhow::Error;

pub type Result<T = (), E = Error> = core::result::Result<T, E>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Controller {
    Rogue,
    FixedWindow,
}

impl Controller {
    const VARIANTS: &'static [&'static str] = &["rogue", "fixed-window"];

    fn name(self) -> &'static str {
        match self {
            Self::Rogue => "rogue",
            Self::FixedWindow => "fixed-window",
        }
    }
}

impl FromStr for Controller {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "rogue" => Self::Rogue,
            "fixed-window" => Self::FixedWindow,
            _ => bail!("unknown controller {s:?}"),
        })
    }
}

/// Simulates a bulk transfer through a congestion controller and reports its throughput
#[derive(Debug, StructOpt)]
struct Args {
    /// The send rate of the rogue controller, e.g. `8Mbps`, `1MBps` or bits per second
    #[structopt(short, long)]
    bandwidth: Option<Bandwidth>,

    /// The number of bytes to transfer
    #[structopt(short, long, default_value = "1000000")]
    data: u64,

    #[structopt(long, default_value = "1200")]
    max_datagram_size: u16,

    /// The round trip time of the simulated path
    #[structopt(long, default_value = "10ms", parse(try_from_str = humantime::parse_duration))]
    rtt: Duration,

    #[structopt(long, default_value = "rogue", possible_values = Controller::VARIANTS)]
    controller: Controller,

    /// Sleep on the wall clock until each departure instead of simulating time
    #[structopt(long)]
    real_time: bool,

    /// Print the report as JSON
    #[structopt(long)]
    json: bool,
}

impl Args {
    fn run<T: Timer + Clone + Send + Sync + 'static>(&self, clock: T) -> Result {
        let format = tracing_subscriber::fmt::format()
            .with_level(false) // don't include levels in formatted output
            .with_timer(Uptime(clock.clone()))
            .with_ansi(false)
            .compact(); // Use a less verbose output format.

        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .event_format(format)
            .init();

        let report = self.simulate(clock)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print!("{report}");
        }

        Ok(())
    }

    fn simulate<T: Timer + Clone + Send + 'static>(&self, clock: T) -> Result<Report> {
        let transfer = Transfer {
            data: self.data,
            max_datagram_size: self.max_datagram_size,
            rtt: self.rtt,
        };
        let name = self.controller.name();

        let report = match self.controller {
            Controller::Rogue => {
                let bandwidth = self
                    .bandwidth
                    .context("--bandwidth is required by the rogue controller")?;
                let mut controller = rogue::builder()
                    .with_bandwidth(bandwidth)?
                    .with_max_datagram_size(self.max_datagram_size)?
                    .build(clock.clone())?;
                let outcome = transfer.run(&mut controller, &clock)?;
                let max_burst_bytes = controller.max_burst_bytes() as u64;
                Report::new(
                    name,
                    Some(bandwidth),
                    Some(max_burst_bytes),
                    &transfer,
                    &outcome,
                )
            }
            Controller::FixedWindow => {
                let mut controller = fixed_window::Endpoint::default()
                    .new_congestion_controller(PathInfo::new(self.max_datagram_size));
                let outcome = transfer.run(&mut controller, &clock)?;
                Report::new(name, None, None, &transfer, &outcome)
            }
        };

        Ok(report)
    }
}

fn main() -> Result {
    let args = Args::from_args();

    if args.real_time {
        args.run(StdClock::default())
    } else {
        args.run(testing::Clock::default())
    }
}

struct Uptime<C>(C);

impl<C: Clock> tracing_subscriber::fmt::time::FormatTime for Uptime<C> {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", self.0.get_time())
    }
}
