//! clash-override: CLI tool for generating Clash configs from subscriptions.

use clap::{Args, Parser, Subcommand, ValueEnum};
use clash_override::region::{classify, has_low_cost};
use clash_override::rules::{filter_rules, RuleProviders, RULES};
use clash_override::{generate, Options, SourceConfig};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "clash-override")]
#[command(author = "Kaitu.io")]
#[command(version = "0.1.0")]
#[command(about = "Generate a complete Clash config from a subscription's proxies", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the full configuration document
    Generate {
        /// Input subscription (YAML or JSON with a `proxies` list)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file, stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Yaml)]
        format: Format,

        /// Fail if any group member or rule target does not resolve
        #[arg(long)]
        strict: bool,

        #[command(flatten)]
        flags: FlagArgs,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show region classification and rule switches without generating
    Inspect {
        /// Input subscription (YAML or JSON with a `proxies` list)
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        flags: FlagArgs,
    },
}

#[derive(Args)]
struct FlagArgs {
    /// Use load-balance instead of url-test for region groups
    #[arg(long)]
    loadbalance: bool,

    /// Enable front-proxy and landing node groups
    #[arg(long)]
    landing: bool,

    /// Enable IPv6
    #[arg(long)]
    ipv6: bool,

    /// Emit runtime settings for a standalone client
    #[arg(long)]
    full: bool,

    /// Keep TCP keep-alive enabled (with --full)
    #[arg(long)]
    keepalive: bool,

    /// Sub-Store style arguments, e.g. "landing=true&ipv6=1"
    #[arg(long)]
    args: Option<String>,

    /// YAML mapping of rule category to enabled flag
    #[arg(long)]
    rule_options: Option<PathBuf>,

    /// Enable a rule category (repeatable)
    #[arg(long = "enable", value_name = "CATEGORY")]
    enable: Vec<String>,

    /// Disable a rule category (repeatable)
    #[arg(long = "disable", value_name = "CATEGORY")]
    disable: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            output,
            format,
            strict,
            flags,
            verbose,
        } => {
            if let Err(e) = generate_file(&input, output.as_deref(), format, strict, &flags, verbose) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Inspect { input, flags } => {
            if let Err(e) = inspect(&input, &flags) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn build_options(flags: &FlagArgs) -> Result<Options, Box<dyn std::error::Error>> {
    let mut options = Options {
        load_balance: flags.loadbalance,
        landing: flags.landing,
        ipv6: flags.ipv6,
        full: flags.full,
        keep_alive: flags.keepalive,
        ..Options::default()
    };

    if let Some(query) = &flags.args {
        options.apply_query(query)?;
    }
    if let Some(path) = &flags.rule_options {
        options.rules.merge_yaml(&fs::read_to_string(path)?)?;
    }
    for category in &flags.enable {
        options.rules.set(category.as_str(), true);
    }
    for category in &flags.disable {
        options.rules.set(category.as_str(), false);
    }

    Ok(options)
}

fn generate_file(
    input: &Path,
    output: Option<&Path>,
    format: Format,
    strict: bool,
    flags: &FlagArgs,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = build_options(flags)?;

    if verbose {
        println!("Reading input file: {:?}", input);
    }
    let source = SourceConfig::from_path(input)?;
    let doc = generate(source, &options);

    if let Err(e) = doc.validate() {
        if strict {
            return Err(e.into());
        }
        log::warn!("Generated config does not validate: {}", e);
    }

    if verbose {
        println!(
            "Generated {} groups, {} rules, {} rule-providers",
            doc.proxy_groups.len(),
            doc.rules.len(),
            doc.rule_providers.len()
        );
    }

    let rendered = match format {
        Format::Yaml => doc.to_yaml()?,
        Format::Json => doc.to_json()?,
    };

    match output {
        Some(path) => {
            fs::write(path, rendered)?;
            if verbose {
                println!("Wrote {:?}", path);
            }
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

fn inspect(input: &Path, flags: &FlagArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = build_options(flags)?;
    let source = SourceConfig::from_path(input)?;

    println!("Nodes: {}", source.proxies.len());
    println!("Low-cost nodes: {}", has_low_cost(&source.proxies));
    println!("Regions:");
    for r in classify(&source.proxies) {
        println!("  {}: {}", r.region.label, r.count);
    }

    let filtered = filter_rules(RULES, &options.rules);
    println!("Rules ({} of {} enabled):", filtered.rules.len(), RULES.len());
    for line in filtered.lines() {
        println!("  {}", line);
    }
    println!("Rule-providers:");
    for name in RuleProviders::enabled(&options.rules).names() {
        println!("  {}", name);
    }
    println!("Disabled groups:");
    for name in filtered.disabled_groups.iter() {
        println!("  {}", name);
    }
    Ok(())
}
