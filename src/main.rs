use clap::{CommandFactory, Parser};
use hds_converter::cli::args::{Args, Commands};
use hds_converter::cli::commands;
use std::process;
use tokio_util::sync::CancellationToken;

fn main() {
    let args = Args::parse();

    // Without a subcommand, show help and exit
    let Some(Commands::Convert(convert_args)) = args.command else {
        let _ = Args::command().print_help();
        println!();
        process::exit(0);
    };

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        let cancellation_token = CancellationToken::new();

        // Ctrl+C stops admitting new files; files in flight finish normally
        let signal_token = cancellation_token.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    eprintln!("\nReceived CTRL+C, finishing files in progress...");
                    signal_token.cancel();
                }
                Err(e) => eprintln!("Failed to install CTRL+C handler: {}", e),
            }
        });

        commands::run(convert_args, cancellation_token).await
    });

    match result {
        Ok(_summary) => process::exit(0),
        Err(error) => {
            if commands::is_configuration_error(&error) {
                eprintln!("Configuration error: {:#}", error);
            } else {
                eprintln!("Error: {:#}", error);
            }
            process::exit(1);
        }
    }
}
