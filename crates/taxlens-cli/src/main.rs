// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod report;
mod telemetry;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use report::Report;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use taxlens_app::{
    AppealResult, AssessmentAnswers, Estimator, OwnershipLength, PropertyResponse, PropertyUse,
    RecentChanges, TaxSituation, validate_property_data,
};
use taxlens_attom::{Client, FullPropertyLookup};
use tracing::{info, warn};

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `taxlens --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;
    telemetry::init(config.log_level()).context("initialize logging")?;

    if options.check_only {
        if config.attom_api_key().is_some() {
            Client::new(&config.attom_config()?).with_context(|| {
                format!(
                    "invalid [attom] config in {}; fix base_url/api_key/timeout values",
                    options.config_path.display()
                )
            })?;
        } else {
            warn!("no ATTOM API key configured; only --search-json lookups will work");
        }
        return Ok(());
    }

    let Some(input) = &options.input else {
        bail!("nothing to look up; pass --address or --search-json (see --help)");
    };

    let lookup = match input {
        Input::Address(address) => {
            let client = Client::new(&config.attom_config()?)?;
            client.full_property(address)?
        }
        Input::Files { search, detail } => FullPropertyLookup {
            search: read_response(search)?,
            detail: detail.as_deref().map(read_response).transpose()?,
        },
    };

    let mapped = lookup
        .map_with(&Estimator::default())
        .ok_or_else(|| anyhow!("no property found; check the address and try again"))?;
    let validation = validate_property_data(&mapped.data);
    let appeal = options
        .answers()
        .map(|answers| AppealResult::evaluate(&mapped.data, &answers));
    info!(
        address = %mapped.data.address,
        quality = mapped.data.data_quality.as_str(),
        valid = validation.is_valid,
        "property mapped"
    );

    let report = Report {
        mapped: &mapped,
        validation: &validation,
        appeal: appeal.as_ref(),
    };
    if options.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.to_text());
    }

    if !validation.is_valid {
        bail!(
            "property data failed validation: {}",
            validation.error_messages().join("; ")
        );
    }
    Ok(())
}

fn read_response(path: &Path) -> Result<PropertyResponse> {
    let raw = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    PropertyResponse::from_slice(&raw)
        .with_context(|| format!("decode property response {}", path.display()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Address(String),
    Files {
        search: PathBuf,
        detail: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
    json: bool,
    input: Option<Input>,
    tax_situation: Option<TaxSituation>,
    property_use: Option<PropertyUse>,
    ownership_length: Option<OwnershipLength>,
    recent_changes: Option<RecentChanges>,
}

impl CliOptions {
    /// Answers exist only when a tax situation was given.
    fn answers(&self) -> Option<AssessmentAnswers> {
        let mut answers = AssessmentAnswers::new(self.tax_situation?);
        if let Some(property_use) = self.property_use {
            answers.property_use = property_use;
        }
        if let Some(ownership_length) = self.ownership_length {
            answers.ownership_length = ownership_length;
        }
        if let Some(recent_changes) = self.recent_changes {
            answers.recent_changes = recent_changes;
        }
        Some(answers)
    }
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
        json: false,
        input: None,
        tax_situation: None,
        property_use: None,
        ownership_length: None,
        recent_changes: None,
    };
    let mut address = None;
    let mut search_json = None;
    let mut detail_json = None;

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        let flag = arg.as_ref();
        match flag {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--address" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--address requires an address"))?;
                address = Some(value.as_ref().to_owned());
            }
            "--search-json" | "--detail-json" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("{flag} requires a file path"))?;
                let path = PathBuf::from(value.as_ref());
                if flag == "--search-json" {
                    search_json = Some(path);
                } else {
                    detail_json = Some(path);
                }
            }
            "--tax-situation" => {
                let value = flag_value(flag, iter.next())?;
                options.tax_situation = Some(parse_choice(
                    flag,
                    &value,
                    TaxSituation::parse,
                    TaxSituation::ALL.map(TaxSituation::as_str),
                )?);
            }
            "--use" => {
                let value = flag_value(flag, iter.next())?;
                options.property_use = Some(parse_choice(
                    flag,
                    &value,
                    PropertyUse::parse,
                    PropertyUse::ALL.map(PropertyUse::as_str),
                )?);
            }
            "--ownership" => {
                let value = flag_value(flag, iter.next())?;
                options.ownership_length = Some(parse_choice(
                    flag,
                    &value,
                    OwnershipLength::parse,
                    OwnershipLength::ALL.map(OwnershipLength::as_str),
                )?);
            }
            "--changes" => {
                let value = flag_value(flag, iter.next())?;
                options.recent_changes = Some(parse_choice(
                    flag,
                    &value,
                    RecentChanges::parse,
                    RecentChanges::ALL.map(RecentChanges::as_str),
                )?);
            }
            "--json" => {
                options.json = true;
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    options.input = match (address, search_json, detail_json) {
        (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
            bail!("--address cannot be combined with --search-json/--detail-json")
        }
        (Some(address), None, None) => Some(Input::Address(address)),
        (None, Some(search), detail) => Some(Input::Files { search, detail }),
        (None, None, Some(_)) => bail!("--detail-json requires --search-json"),
        (None, None, None) => None,
    };

    if options.tax_situation.is_none()
        && (options.property_use.is_some()
            || options.ownership_length.is_some()
            || options.recent_changes.is_some())
    {
        bail!("--use, --ownership and --changes require --tax-situation");
    }

    Ok(options)
}

fn flag_value<S: AsRef<str>>(flag: &str, value: Option<S>) -> Result<String> {
    value
        .map(|value| value.as_ref().to_owned())
        .ok_or_else(|| anyhow!("{flag} requires a value"))
}

fn parse_choice<T, const N: usize>(
    flag: &str,
    value: &str,
    parse: fn(&str) -> Option<T>,
    choices: [&'static str; N],
) -> Result<T> {
    parse(value).ok_or_else(|| {
        anyhow!(
            "invalid {flag} value {value:?}; expected one of: {}",
            choices.join(", ")
        )
    })
}

fn print_help() {
    println!("taxlens: property tax appeal lookup");
    println!("  --address <text>         Look up a property through the ATTOM API");
    println!("  --search-json <path>     Map a saved ATTOM search response instead");
    println!("  --detail-json <path>     Saved detail response (requires --search-json)");
    println!("  --tax-situation <value>  significant | moderate | small | exploring");
    println!("  --use <value>            primary | investment | commercial | vacation | rental | other");
    println!("  --ownership <value>      under1 | 1-3 | 4-7 | 8-15 | 16-25 | over25");
    println!("  --changes <value>        major | minor | none | damage");
    println!("  --json                   Print the report as JSON");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --check                  Validate config and ATTOM client settings");
    println!("  --help                   Show this help");
}
