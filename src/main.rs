//! Sandbox Template CLI
//!
//! Usage:
//!   sandbox-template [OPTIONS] [FILE]
//!
//! Options:
//!   -t, --template <KEY:VALUE>  Declare a template (repeatable)
//!   -c, --config <FILE>         Template file (TOML format)
//!   -d, --debug                 Debug logging and registry dump
//!   --check                     Classify lines instead of expanding them
//!   -h, --help                  Print help

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sandbox_template::{
    process_line, BuiltinMacros, EngineConfig, TemplateFile, TemplateRegistry,
};

#[derive(Parser)]
#[command(name = "sandbox-template")]
#[command(about = "Expand ${KEY} templates in sandbox profile lines")]
struct Cli {
    /// Profile file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Template declaration in KEY:VALUE form
    #[arg(short, long = "template", value_name = "KEY:VALUE")]
    templates: Vec<String>,

    /// Template file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Debug mode: log registrations and dump the registry
    #[arg(short, long)]
    debug: bool,

    /// Print the pre-flight class of each line instead of expanding it
    #[arg(long)]
    check: bool,
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    // Load template file
    let file = match &cli.config {
        Some(path) => match TemplateFile::from_file(path) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Error loading template file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => TemplateFile::default(),
    };

    let config = file.apply(EngineConfig::new().with_debug(cli.debug));
    let mut registry = TemplateRegistry::with_config(BuiltinMacros, config);

    let declared = registry.register_file(&file).and_then(|()| {
        cli.templates
            .iter()
            .try_for_each(|arg| registry.check_template(arg))
    });
    if let Err(e) = declared {
        eprintln!("Error: {}", e);
        registry.clear();
        std::process::exit(1);
    }
    registry.dump_all();

    // Read input
    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                registry.clear();
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    registry.clear();
                    std::process::exit(1);
                }
            }
        }
    };

    let source_name = cli
        .input
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<stdin>".to_string());

    for line in source.lines() {
        let trimmed = line.trim_start();

        // Comments and blank lines are not profile commands
        if trimmed.is_empty() || trimmed.starts_with('#') {
            if !cli.check {
                println!("{}", line);
            }
            continue;
        }

        if cli.check {
            println!("{}\t{}", registry.classify(line), line);
            continue;
        }

        match process_line(&registry, line) {
            Ok(expanded) => println!("{}", expanded),
            Err(e) => {
                eprintln!("{}", e.format(&source_name).trim_end());
                registry.clear();
                std::process::exit(1);
            }
        }
    }

    registry.clear();
}
