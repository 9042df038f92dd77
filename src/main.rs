use clap::Parser;
use journal_convert::application::{ConvertService, InspectService};
use journal_convert::cli::{
    format_conversion_report, format_event_catalogue, format_journal_summaries, Cli, Commands,
};
use journal_convert::domain::JournalEvent;
use journal_convert::error::ConvertError;
use journal_convert::infrastructure::Config;
use tracing_subscriber::EnvFilter;

fn main() {
    // Logs go to stderr so converted output and reports stay clean on stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<(), ConvertError> {
    match cli.command {
        Commands::Convert {
            input,
            output,
            config,
            indent,
        } => {
            let mut config = Config::resolve(config.as_deref())?;
            if let Some(indent) = indent {
                config.indent = indent;
            }

            let report = ConvertService::new(config).execute(&input, &output)?;
            print!("{}", format_conversion_report(&report));
            Ok(())
        }
        Commands::Inspect { input } => {
            let journals = InspectService::execute(&input)?;
            print!(
                "{}",
                format_journal_summaries(&journals, chrono::Utc::now().timestamp())
            );
            Ok(())
        }
        Commands::Events { event, json } => {
            let events = match event {
                Some(event) => vec![event],
                None => JournalEvent::ALL.to_vec(),
            };
            if json {
                let descriptors: Vec<_> = events.iter().map(|e| e.descriptor()).collect();
                println!("{}", serde_json::to_string_pretty(&descriptors)?);
            } else {
                print!("{}", format_event_catalogue(&events));
            }
            Ok(())
        }
    }
}
