use clap::{ArgAction, Parser, Subcommand};
use rxreport_lib::notebook::write_notebook;
use rxreport_lib::report::{write_reports, RateLibraries, ReportOptions};
use rxreport_lib::{inline_styles_with, CssMode, InlineOptions, MergePolicy};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rxreport")]
#[command(about = "Compare collapsed reaction rates and post-process the HTML reports")]
struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Move identifier-keyed <style> rules onto the elements they target.
    Inline {
        /// Input HTML file.
        input: PathBuf,

        /// Output file; stdout when omitted.
        output: Option<PathBuf>,

        /// Append declarations verbatim instead of overriding repeated properties.
        #[arg(long)]
        append: bool,

        /// Fail on malformed CSS instead of skipping it.
        #[arg(long)]
        strict: bool,
    },

    /// Wrap an HTML file in a single-cell notebook.
    Notebook {
        /// Input HTML file.
        input: PathBuf,

        /// Notebook to write.
        output: PathBuf,

        /// Inline styles before wrapping.
        #[arg(long)]
        inline: bool,
    },

    /// Write one ratio table per reaction from a reaction-rate JSON file.
    Report {
        /// JSON file of library -> nuclide -> reaction -> rate.
        rates: PathBuf,

        /// Suffix appended to every report name.
        suffix: String,

        /// Directory receiving the reports.
        #[arg(long, default_value = "reports")]
        out_dir: PathBuf,

        /// Inline styles in the written HTML.
        #[arg(long)]
        inline: bool,

        /// Also write a notebook per report.
        #[arg(long)]
        notebook: bool,
    },
}

fn main() {
    // parse the args given in terminal
    let args: Args = Args::parse();

    let level = match args.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    rxreport_lib::init_logger(level);

    if let Err(e) = run(args.command) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(command: Command) -> rxreport_lib::Result<()> {
    match command {
        Command::Inline {
            input,
            output,
            append,
            strict,
        } => {
            let options = InlineOptions {
                merge: if append {
                    MergePolicy::Append
                } else {
                    MergePolicy::Override
                },
                mode: if strict {
                    CssMode::Strict
                } else {
                    CssMode::Lenient
                },
            };
            let html = fs::read_to_string(&input)?;
            let report = inline_styles_with(&html, &options)?;
            for skipped in &report.skipped {
                log::info!("skipped {}", skipped);
            }
            match output {
                Some(path) => fs::write(path, report.html)?,
                None => println!("{}", report.html),
            }
        }
        Command::Notebook {
            input,
            output,
            inline,
        } => {
            let mut html = fs::read_to_string(&input)?;
            if inline {
                html = rxreport_lib::inline_styles(&html)?;
            }
            write_notebook(&html, output)?;
        }
        Command::Report {
            rates,
            suffix,
            out_dir,
            inline,
            notebook,
        } => {
            let rates = RateLibraries::from_path(&rates)?;
            let options = ReportOptions {
                inline,
                notebook,
                ..ReportOptions::default()
            };
            let written = write_reports(&rates, &suffix, &out_dir, &options)?;
            log::info!("wrote {} files to {}", written.len(), out_dir.display());
        }
    }
    Ok(())
}
