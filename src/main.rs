//! testipv6 - command-line entry point

use clap::Parser;
use std::process;
use testipv6::{
    app::App,
    cli::Cli,
    error::{AppError, ErrorReporter},
};

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(99);
    }));

    // Usage errors exit 1 like every other configuration problem
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };
    let reporter = ErrorReporter::new(cli.use_colors(), cli.verbose);

    if let Err(message) = cli.validate() {
        let error = AppError::validation(message);
        reporter.report_error(&error);
        process::exit(error.exit_code());
    }

    if cli.debug {
        eprintln!("{}", testipv6::build_info());
    }

    if let Err(e) = App::new(cli).run().await {
        reporter.report_error(&e);
        process::exit(e.exit_code());
    }
}
