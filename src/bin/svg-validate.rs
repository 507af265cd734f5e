#![warn(unused)]

use anyhow::{Context, Result};
use clap::{crate_version, value_parser};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use safesvg::{DataUrlPolicy, Validator};

/// Command-line options for `svg-validate`.
#[derive(Debug)]
struct Opt {
    /// Overrides the default maximum reference amplification.
    max_references: Option<u64>,

    /// Accept `data:` URLs without MIME parameters without looking at them.
    permissive_data_urls: bool,

    /// Print the minified document after validating it.
    minify: bool,

    /// Files to validate.
    inputs: Vec<PathBuf>,
}

fn build_cli() -> clap::Command {
    clap::Command::new("svg-validate")
        .version(concat!("version ", crate_version!()))
        .about("Checks SVG files against a whitelist and rejects unsafe ones.")
        .arg(
            clap::Arg::new("max-references")
                .long("max-references")
                .value_name("N")
                .help("Maximum reference amplification before a document is rejected")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            clap::Arg::new("permissive-data-urls")
                .long("permissive-data-urls")
                .help("Accept data: URLs in href that have no MIME parameters")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("minify")
                .long("minify")
                .help("Print the minified document to stdout if it is accepted")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("inputs")
                .help("SVG files to validate")
                .value_name("FILES")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .action(clap::ArgAction::Append),
        )
}

fn make_validator(opt: &Opt) -> Validator {
    let mut validator = Validator::new();

    if let Some(max) = opt.max_references {
        validator = validator.with_max_references(max);
    }

    if opt.permissive_data_urls {
        validator = validator.with_data_url_policy(DataUrlPolicy::Permissive);
    }

    validator
}

fn minify_to_stdout(path: &Path) -> Result<()> {
    let data = fs::read(path).with_context(|| format!("could not read {}", path.display()))?;
    let minified = safesvg::minify::minify(&data)
        .with_context(|| format!("could not minify {}", path.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    out.write_all(&minified)?;
    out.flush()?;

    Ok(())
}

/// Validates every input; returns whether all of them were accepted.
fn run(opt: &Opt) -> Result<bool> {
    let validator = make_validator(opt);
    let mut all_ok = true;

    for path in &opt.inputs {
        match validator.validate_path(path) {
            Ok(()) => {
                if opt.minify {
                    eprintln!("OK {}", path.display());
                    minify_to_stdout(path)?;
                } else {
                    println!("OK {}", path.display());
                }
            }

            Err(e) => {
                all_ok = false;

                if opt.minify {
                    eprintln!("{}: {}", path.display(), e);
                } else {
                    println!("{}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(all_ok)
}

fn main() {
    let matches = build_cli().get_matches();

    let opt = Opt {
        max_references: matches.get_one("max-references").copied(),
        permissive_data_urls: matches.get_flag("permissive-data-urls"),
        minify: matches.get_flag("minify"),
        inputs: matches
            .get_many("inputs")
            .map(|inputs| inputs.cloned().collect())
            .unwrap_or_default(),
    };

    if opt.minify && opt.inputs.len() != 1 {
        eprintln!("--minify needs exactly one input file");
        process::exit(2);
    }

    match run(&opt) {
        Ok(true) => (),
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("{e:#}");
            process::exit(1);
        }
    }
}
