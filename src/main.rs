use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::io::{self, Write};
use std::path::PathBuf;

use mdlite_lib::HtmlRenderer;
use mdlite_lib::config as mdlite_config;
use mdlite_lib::exit_codes;
use mdlite_lib::file_processor::{self, Input, OutputTarget};

use mdlite_config::{Config, SourcedConfig};

#[derive(Parser)]
#[command(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Control colored output: auto, always, never
    #[arg(long, global = true, default_value = "auto", value_parser = ["auto", "always", "never"])]
    color: String,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    /// Ignore all configuration files and use built-in defaults
    #[arg(long, global = true)]
    no_config: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render Markdown files to HTML
    Render(RenderArgs),
    /// Show the active configuration
    Config {
        /// Show only the default configuration values
        #[arg(long)]
        defaults: bool,
        /// Output format
        #[arg(long, default_value = "toml", value_parser = ["toml", "json"])]
        output: String,
    },
    /// Create a default .mdlite.toml in the current directory
    Init,
    /// Show version information
    Version,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Files or directories to render (use '-' for stdin, the default)
    paths: Vec<String>,

    /// Write HTML to stdout instead of files
    #[arg(long)]
    stdout: bool,

    /// Write rendered files into this directory
    #[arg(long, value_name = "DIR", conflicts_with = "stdout")]
    out_dir: Option<PathBuf>,

    /// Suppress progress messages
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    // Reset SIGPIPE to default behavior on Unix so piping to `head` etc. works correctly.
    #[cfg(unix)]
    {
        // SAFETY: restoring the default SIGPIPE disposition before any output is written.
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }

    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    // RUST_LOG takes precedence over the flag
    env_logger::Builder::new().filter_level(level).parse_default_env().init();

    match cli.color.as_str() {
        "always" => colored::control::set_override(true),
        "never" => colored::control::set_override(false),
        _ => colored::control::unset_override(),
    }

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            exit_codes::TOOL_ERROR
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    match cli.command {
        Commands::Render(args) => {
            let sourced = load_config(cli.config.as_deref(), cli.no_config)?;
            render_command(args, &sourced.config)
        }
        Commands::Config { defaults, output } => {
            let sourced = if defaults {
                SourcedConfig::default()
            } else {
                load_config(cli.config.as_deref(), cli.no_config)?
            };
            print_config(&sourced, &output)?;
            Ok(exit_codes::SUCCESS)
        }
        Commands::Init => {
            let path = mdlite_config::CONFIG_FILES[0];
            mdlite_config::create_default_config(path)?;
            println!("Created default configuration file: {path}");
            Ok(exit_codes::SUCCESS)
        }
        Commands::Version => {
            println!("mdlite {}", env!("CARGO_PKG_VERSION"));
            Ok(exit_codes::SUCCESS)
        }
    }
}

fn load_config(config_path: Option<&str>, no_config: bool) -> anyhow::Result<SourcedConfig> {
    let sourced = SourcedConfig::load_with_discovery(config_path, no_config).context("Config error")?;
    match &sourced.loaded_file {
        Some(path) => log::debug!("Using {} configuration from {}", sourced.source, path.display()),
        None => log::debug!("Using default configuration"),
    }
    Ok(sourced)
}

fn print_config(sourced: &SourcedConfig, format: &str) -> anyhow::Result<()> {
    let rendered = if format == "json" {
        sourced.config.to_json_string()?
    } else {
        let mut toml = String::new();
        if let Some(path) = &sourced.loaded_file {
            toml.push_str(&format!("# Loaded from: {}\n\n", path.display()));
        }
        toml.push_str(&sourced.config.to_toml_string()?);
        toml
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

fn render_command(args: RenderArgs, config: &Config) -> anyhow::Result<i32> {
    let renderer = HtmlRenderer::with_symbols(config.symbol_table()?);

    let paths = if args.paths.is_empty() {
        vec!["-".to_string()]
    } else {
        args.paths
    };
    let inputs = file_processor::discover_inputs(&paths, config)?;

    let target = if args.stdout {
        OutputTarget::Stdout
    } else if let Some(dir) = args.out_dir {
        OutputTarget::Directory(dir)
    } else {
        OutputTarget::Sibling
    };

    let mut stdout = io::stdout().lock();
    let mut files = Vec::new();
    for input in inputs {
        match input {
            Input::Stdin => {
                let html = file_processor::render_reader(io::stdin().lock(), &renderer)?;
                stdout.write_all(html.as_bytes()).context("Failed to write to stdout")?;
            }
            Input::File(path) => files.push(path),
        }
    }

    if files.is_empty() && !paths.iter().any(|p| p == "-") {
        if !args.quiet {
            eprintln!("{}: No Markdown files found", "Warning".yellow().bold());
        }
        return Ok(exit_codes::SUCCESS);
    }

    let mut failures = 0;
    for result in file_processor::render_files(&files, &renderer, &target, &config.global.extension) {
        match result {
            Ok(rendered) => match rendered.output {
                Some(output) => {
                    if !args.quiet {
                        eprintln!("Rendered {} -> {}", rendered.input.display(), output.display());
                    }
                }
                None => stdout
                    .write_all(rendered.html.as_bytes())
                    .context("Failed to write to stdout")?,
            },
            Err(e) => {
                eprintln!("{}: {}", "Error".red().bold(), e);
                failures += 1;
            }
        }
    }
    stdout.flush().context("Failed to write to stdout")?;

    Ok(if failures > 0 {
        exit_codes::RENDER_FAILURE
    } else {
        exit_codes::SUCCESS
    })
}
