use clap::{App, Arg};
use log::LevelFilter;
use std::process;

use tape36::pack::{mode_help, PackingMode};
use tape36::tape::STDINOUT_PSEUDOFILENAME;
use tape36::{convert, ConvertOptions};

// Possible exit codes
static _EXIT_SUCCESS: i32 = 0;
static EXIT_FAILURE: i32 = 1;

fn main() {
    let after_help = format!(
        "INFILE and OUTFILE default to standard input and output.\n\
         Input and output modes default to core-dump.\n\n\
         MODES:\n{}",
        mode_help()
    );

    // Parse command-line arguments
    let matches = App::new("tape36")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert .tap images of 36-bit tapes from one data packing mode to another.")
        .after_help(after_help.as_str())
        .arg(
            Arg::with_name("input_mode")
                .short("i")
                .long("input-mode")
                .value_name("MODE")
                .takes_value(true)
                .validator(mode_validator)
                .help("Packing mode of the input tape"),
        )
        .arg(
            Arg::with_name("output_mode")
                .short("o")
                .long("output-mode")
                .value_name("MODE")
                .takes_value(true)
                .validator(mode_validator)
                .help("Packing mode of the output tape"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("Provide processing details (repeat for more)"),
        )
        .arg(
            Arg::with_name("length")
                .long("length")
                .value_name("LENGTH")
                .takes_value(true)
                .requires("density")
                .help("Reel length, e.g. 2400ft or 730m, to report end of tape"),
        )
        .arg(
            Arg::with_name("density")
                .long("density")
                .value_name("DENSITY")
                .takes_value(true)
                .requires("length")
                .help("Recording density in frames per inch, e.g. 1600"),
        )
        .arg(Arg::with_name("infile").required(false))
        .arg(Arg::with_name("outfile").required(false))
        .get_matches();

    init_logging(matches.occurrences_of("verbose"));

    let options = ConvertOptions {
        input: matches
            .value_of("infile")
            .unwrap_or(STDINOUT_PSEUDOFILENAME)
            .to_string(),
        output: matches
            .value_of("outfile")
            .unwrap_or(STDINOUT_PSEUDOFILENAME)
            .to_string(),
        input_mode: mode_parser(matches.value_of("input_mode")),
        output_mode: mode_parser(matches.value_of("output_mode")),
        length: matches.value_of("length").map(str::to_string),
        density: matches.value_of("density").map(str::to_string),
    };

    match convert(&options) {
        Ok(summary) => {
            if summary.end_of_tape {
                log::warn!("Output is longer than the reel");
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(EXIT_FAILURE);
        }
    }
}

/// Log warnings by default, and more with each -v.  RUST_LOG, when set,
/// takes precedence.
fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// Require a mode argument to name a known packing mode.
fn mode_validator(v: String) -> Result<(), String> {
    match PackingMode::from_name(&v) {
        Some(_) => Ok(()),
        None => Err(format!(
            "Unknown mode \"{}\".  Expected one of: {}",
            v,
            PackingMode::names().collect::<Vec<_>>().join(", ")
        )),
    }
}

fn mode_parser(v: Option<&str>) -> PackingMode {
    v.and_then(PackingMode::from_name).unwrap_or_default()
}
