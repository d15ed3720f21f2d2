use std::net::SocketAddr;
use std::process;

use getopts::{Matches, Options};
use reqwest::Url;
use tokio::time::Duration;

#[derive(Debug)]
pub struct Args {
    pub address: SocketAddr,
    pub upstream: Url,
    pub enable_cache: bool,
    pub cache_ttl: Duration,
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optopt(
        "u",
        "upstream",
        "Endpoint listing approved events as JSON (required)",
        "URL",
    );
    opts.optopt(
        "a",
        "address",
        "Address to serve the calendar on, 127.0.0.1:8080 if omitted",
        "HOST:PORT",
    );
    opts.optflag("c", "enable-cache", "Reuse upstream rows between requests");
    opts.optopt(
        "t",
        "cache-ttl",
        "How long cached rows stay fresh, 300 if omitted",
        "SECONDS",
    );
    opts.optflag("h", "help", "Show this usage summary and exit");
    opts
}

pub fn parse(args: Vec<String>) -> Args {
    let opts = opts();

    let matches = match opts.parse(args) {
        Ok(matches) => matches,
        Err(fail) => {
            eprintln!("{fail}");
            process::exit(1);
        }
    };

    if matches.opt_present("help") {
        println!("{}", opts.usage(&opts.short_usage(env!("CARGO_PKG_NAME"))));
        process::exit(0);
    }

    match args_from(&matches) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}

fn args_from(matches: &Matches) -> Result<Args, String> {
    let address = matches
        .opt_get_default("address", SocketAddr::from(([127, 0, 0, 1], 8080)))
        .map_err(|err| format!("Provided value for option 'address' is invalid: {err}"))?;

    let upstream = matches
        .opt_str("upstream")
        .ok_or_else(|| "Missing required option 'upstream'".to_string())?;
    let upstream = Url::parse(&upstream)
        .map_err(|err| format!("Provided value for option 'upstream' is invalid: {err}"))?;

    let enable_cache = matches.opt_present("enable-cache");

    let cache_ttl = matches
        .opt_get_default("cache-ttl", 300)
        .map(Duration::from_secs)
        .map_err(|err| format!("Provided value for option 'cache-ttl' is invalid: {err}"))?;

    Ok(Args {
        address,
        upstream,
        enable_cache,
        cache_ttl,
    })
}
