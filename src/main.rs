//! snapcalc - solve photographed calculus problems from the command line

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use env_logger::Env;
use snapcalc::config::LogLevel;
use snapcalc::{
    Config, ProblemType, SolveResult, Solver, TesseractCli, classify, clean_ocr_text, solve_image,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "snapcalc", version, about = "Solve calculus problems from images or text")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log level, overrides the configuration and RUST_LOG
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    /// Directory for the comparison plots
    #[arg(long, global = true, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Recognize an image with tesseract and solve the problem in it
    Image {
        path: PathBuf,
    },
    /// Solve a problem given as text
    Text {
        text: String,
        /// Skip classification and solve as this type
        #[arg(long = "type", value_name = "TYPE")]
        problem: Option<ProblemType>,
    },
    /// Print the detected problem type
    Classify {
        text: String,
    },
    /// Print text after OCR cleanup
    Clean {
        text: String,
    },
}

fn init_logging(cli_level: Option<LogLevel>, config: &Config) {
    let mut builder = match cli_level {
        Some(level) => {
            let mut builder = env_logger::Builder::new();
            builder.filter_level(level.to_filter());
            builder
        }
        None => {
            let fallback = config.logging.level.to_filter().to_string().to_lowercase();
            env_logger::Builder::from_env(Env::default().default_filter_or(fallback))
        }
    };
    builder.format_timestamp(None).init();
}

fn print_result(result: &SolveResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }
    for warning in &result.warnings {
        eprintln!("warning: {}", warning);
    }
    for step in &result.steps {
        println!("{}", step);
    }
    println!("Plot: {}", result.plot_path.display());
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(dir) = cli.output_dir {
        config.solver.output_dir = dir;
    }
    init_logging(cli.log_level, &config);
    log::debug!("configuration: {:?}", config);

    let solver = Solver::new(config.solver.clone());

    match cli.command {
        Command::Image { path } => {
            let image =
                std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
            let recognizer = TesseractCli::from_config(&config.ocr);
            let solution = solve_image(&image, &recognizer, &solver)
                .with_context(|| format!("solving {}", path.display()))?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&solution)?);
            } else {
                println!("Recognized: {}", solution.text);
                print_result(&solution.result, false)?;
            }
        }
        Command::Text { text, problem } => {
            if text.trim().is_empty() {
                bail!("no text to solve");
            }
            let result = match problem {
                Some(problem) => solver.solve(problem, &text),
                None => solver.solve_text(&text),
            }?;
            print_result(&result, cli.json)?;
        }
        Command::Classify { text } => {
            let problem = classify(&text);
            if cli.json {
                println!("{}", serde_json::to_string(&problem)?);
            } else {
                println!("{}", problem);
            }
        }
        Command::Clean { text } => println!("{}", clean_ocr_text(&text)),
    }
    Ok(())
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
