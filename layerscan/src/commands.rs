use crate::CLAP_STYLING;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("layerscan")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("layerscan")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("scan")
                .about(
                    "Scan a hidden service: probe common paths, read robots.txt, and \
                follow same-service links up to a depth limit.",
                )
                .arg(arg!(<URL> "The .onion address to scan"))
                .arg(
                    arg!(-d --"depth" <DEPTH>)
                        .required(false)
                        .help("Maximum crawl depth for internal links; 0 probes the seed only")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Per-request timeout in seconds")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(-t --"concurrency" <NUM>)
                        .required(false)
                        .help("Concurrent path probes per target")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text or json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save the report to a file (default: print to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-c --"config" <PATH>)
                        .required(false)
                        .help("Path to a configuration file"),
                )
                .arg(arg!(-v --"verbose" "Enable debug logging").required(false)),
        )
        .subcommand(
            command!("init")
                .about("Write the default layerscan configuration to your filesystem")
                .arg(
                    arg!([PATH])
                        .required(false)
                        .help("Directory to store the configuration file")
                        .default_value("~/.config/layerscan/"),
                )
                .arg(
                    arg!(-f - -"force")
                        .help("Overwrite an existing configuration file without asking.")
                        .required(false),
                ),
        )
}
