//! Simple command that prints one or '-n count' UUIDv6 strings, decodes a UUIDv6 timestamp, or
//! runs the self-check

use std::{io, io::Write, process::ExitCode};

use clap::{Arg, ArgMatches, Command};
use uuid6::{AsOf, Format};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let matches = command().get_matches();
    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn command() -> Command<'static> {
    Command::new(clap::crate_name!())
        .version(clap::crate_version!())
        .about(clap::crate_description!())
        .arg(
            Arg::new("count")
                .short('n')
                .help("Number of UUIDs to print.")
                .takes_value(true)
                .default_value("1"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .help("Output representation: int, hex, str, or uuid.")
                .takes_value(true)
                .default_value("str"),
        )
        .arg(
            Arg::new("as-of")
                .long("as-of")
                .help("RFC 3339 instant to embed instead of the current time.")
                .takes_value(true),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .help("Node value to use instead of random bits.")
                .takes_value(true),
        )
        .arg(
            Arg::new("seq")
                .long("seq")
                .help("Sequence value to use for the first UUID.")
                .takes_value(true),
        )
        .arg(
            Arg::new("decode")
                .long("decode")
                .help("Print the timestamp embedded in the given UUIDv6 and exit.")
                .takes_value(true)
                .conflicts_with_all(&["check", "as-of", "seed", "seq"]),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .help("Run the self-check and exit."),
        )
}

fn run(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    if matches.is_present("check") {
        uuid6::self_check()?;
        println!("ok");
        return Ok(());
    }

    if let Some(value) = matches.value_of("decode") {
        let dt = uuid6::extract_timestamp(value, false)?;
        println!("{}", dt.map(|dt| dt.to_rfc3339()).unwrap_or_default());
        return Ok(());
    }

    let count: usize = parse_arg(matches, "count")?.unwrap_or(1);
    let format: Format = matches.value_of("format").unwrap_or("str").parse()?;
    let as_of = matches.value_of("as-of").map(AsOf::from);
    let seed: Option<u64> = parse_arg(matches, "seed")?;
    let mut seq: Option<u16> = parse_arg(matches, "seq")?;

    let mut buf = io::BufWriter::new(io::stdout());
    for _ in 0..count {
        // only the first UUID takes the given sequence; the rest increment from it
        let e = uuid6::generate(format, as_of.clone(), seed, seq.take())?;
        writeln!(buf, "{}", e)?;
    }
    buf.flush()?;
    Ok(())
}

fn parse_arg<T: std::str::FromStr>(matches: &ArgMatches, name: &str) -> Result<Option<T>, String> {
    matches
        .value_of(name)
        .map(|v| {
            v.parse()
                .map_err(|_| format!("invalid argument to option '{}': '{}'", name, v))
        })
        .transpose()
}
