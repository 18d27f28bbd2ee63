// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use clap::{App, Arg, ArgMatches};
use log::warn;
use num::Complex;
use std::str::FromStr;

use escapefield::canvas::OutputBuffer;
use escapefield::config::MAX_WORKERS;
use escapefield::{render_into, NeverCancel, PlaneWindow, RenderConfig};

/// Reads `WIDTHxHEIGHT` or `RE,IM` style arguments.
fn split_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    let (left, right) = s.split_once(separator)?;
    Some((left.trim().parse().ok()?, right.trim().parse().ok()?))
}

fn corner(s: &str) -> Option<Complex<f64>> {
    split_pair(s, ',').map(|(re, im)| Complex::new(re, im))
}

fn pair_of<T: FromStr>(
    separator: char,
    what: &'static str,
) -> impl Fn(String) -> Result<(), String> {
    move |s| {
        split_pair::<T>(&s, separator)
            .map(|_| ())
            .ok_or_else(|| format!("Could not parse {}", what))
    }
}

fn count_up_to(limit: usize, what: &'static str) -> impl Fn(String) -> Result<(), String> {
    move |s| match s.parse::<usize>() {
        Ok(n) if (1..=limit).contains(&n) => Ok(()),
        Ok(_) => Err(format!("{} must be between 1 and {}", what, limit)),
        Err(_) => Err(format!("Could not parse {}", what.to_lowercase())),
    }
}

const SIZE: &str = "size";
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const WORKERS: &str = "workers";
const ITERATIONS: &str = "iterations";

const MAX_ITERATIONS: usize = 1_000_000;

fn args<'a>() -> ArgMatches<'a> {
    App::new("escapefield")
        .version("0.1.0")
        .about("Parallel Mandelbrot escape-time renderer")
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("1750x2000")
                .validator(pair_of::<u16>('x', "raster size"))
                .help("Size of the raster, WIDTHxHEIGHT"),
        )
        .arg(
            Arg::with_name(LEFTLOWER)
                .required(false)
                .long(LEFTLOWER)
                .short("l")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-2.5,-2.0")
                .validator(pair_of::<f64>(',', "left lower corner"))
                .help("Left lower corner of the plane window"),
        )
        .arg(
            Arg::with_name(RIGHTUPPER)
                .required(false)
                .long(RIGHTUPPER)
                .short("r")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("1.0,2.0")
                .validator(pair_of::<f64>(',', "right upper corner"))
                .help("Right upper corner of the plane window"),
        )
        .arg(
            Arg::with_name(WORKERS)
                .required(false)
                .long(WORKERS)
                .short("w")
                .takes_value(true)
                .default_value("30")
                .validator(count_up_to(MAX_WORKERS, "Worker count"))
                .help("Number of worker threads"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("60")
                .validator(count_up_to(MAX_ITERATIONS, "Iteration count"))
                .help("Iteration budget per point"),
        )
        .get_matches()
}

// The validators have already run, so a parse failure here means the
// two have drifted apart.
fn config(matches: &ArgMatches) -> Result<RenderConfig, String> {
    let value = |name: &str| matches.value_of(name).ok_or_else(|| format!("missing --{}", name));
    let (width, height): (usize, usize) =
        split_pair(value(SIZE)?, 'x').ok_or("Error parsing raster size")?;
    let leftlower = corner(value(LEFTLOWER)?).ok_or("Error parsing left lower corner")?;
    let rightupper = corner(value(RIGHTUPPER)?).ok_or("Error parsing right upper corner")?;
    let workers: usize = value(WORKERS)?.parse().map_err(|e| format!("{}", e))?;
    let iterations: usize = value(ITERATIONS)?.parse().map_err(|e| format!("{}", e))?;

    Ok(RenderConfig::new(
        PlaneWindow::from_corners(leftlower, rightupper),
        width,
        height,
        iterations,
        workers,
    ))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = args();
    let config = match config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Argument failure: {}", e);
            std::process::exit(2);
        }
    };

    let cores = num_cpus::get();
    if config.workers > cores {
        warn!(
            "{} workers requested but only {} cores available",
            config.workers, cores
        );
    }

    let buffer = config
        .validate()
        .and_then(|_| OutputBuffer::new(config.width, config.height));
    let mut buffer = match buffer {
        Ok(buffer) => buffer,
        Err(e) => {
            eprintln!("Render failure: invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    match render_into(&config, &mut buffer, &NeverCancel) {
        Err(e) => {
            eprintln!("Render failure: {}", e);
            std::process::exit(1);
        }
        Ok(summary) => {
            println!(
                "{}x{}: {} samples, {} in set, took {:?}",
                config.width, config.height, summary.samples, summary.in_set, summary.elapsed
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_need_both_halves() {
        assert_eq!(split_pair::<u16>("40x30", 'x'), Some((40, 30)));
        assert_eq!(corner("-2.5,-2.0"), Some(Complex::new(-2.5, -2.0)));
        assert_eq!(split_pair::<u16>("40", 'x'), None);
        assert_eq!(split_pair::<u16>("40x", 'x'), None);
        assert_eq!(split_pair::<u16>("70000x1", 'x'), None);
    }

    #[test]
    fn counts_are_bounded_on_both_sides() {
        let check = count_up_to(MAX_WORKERS, "Worker count");
        assert!(check("1".to_string()).is_ok());
        assert!(check(MAX_WORKERS.to_string()).is_ok());
        assert_eq!(
            check("0".to_string()),
            Err("Worker count must be between 1 and 1024".to_string())
        );
        assert_eq!(
            check("lots".to_string()),
            Err("Could not parse worker count".to_string())
        );
        assert!(pair_of::<f64>(',', "corner")("1,x".to_string()).is_err());
    }
}
