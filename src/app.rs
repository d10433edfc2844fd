//! Main application orchestration
//!
//! config → runner → analysis → output. Everything diagnostic goes to
//! stderr; stdout carries only the report.

use crate::{
    analysis::{analyze, Analysis},
    cli::Cli,
    config::{display_config_summary, load_config, validate_config, EnvManager},
    error::Result,
    logging::LoggerFactory,
    models::{Config, RunResult},
    output::OutputCoordinator,
    runner::{catalog, CancelSignal, ProbeRunner, RunOverrides, RunnerOptions},
};
use std::path::Path;

/// Written by `--init-env`
const EXAMPLE_ENV_FILE: &str = ".env.example";

/// Main application struct that coordinates all components
pub struct App {
    cli: Cli,
}

impl App {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the application
    pub async fn run(self) -> Result<()> {
        if self.cli.env_help {
            println!("{}", EnvManager::display_env_help());
            return Ok(());
        }

        if self.cli.init_env {
            let path = Path::new(EXAMPLE_ENV_FILE);
            EnvManager::save_example_env_file(path)?;
            println!("Wrote {}", path.display());
            return Ok(());
        }

        let config = load_config(self.cli)?;
        let factory = LoggerFactory::new(config.clone());
        let logger = factory.create_logger("APP").await;
        logger.add_context_field("domain", &config.domain).await;

        logger
            .debug("Configuration loaded")
            .field("domain", &config.domain)
            .field("timeout_ms", config.timeout_ms)
            .field("probes", config.probes())
            .log()
            .await;

        if config.debug {
            eprintln!("Configuration Summary:\n{}\n", display_config_summary(&config));
        }

        let coordinator = OutputCoordinator::from_config(&config);

        if config.verbose || config.debug {
            for warning in validate_config(&config)? {
                eprintln!("{}", warning.format(config.enable_color));
            }
            for warning in EnvManager::validate_current_env() {
                eprintln!("{}", coordinator.display_warning(&warning)?);
            }
            if let Some(warnings) = EnvManager::check_env_file(Path::new(".env"))? {
                for warning in warnings {
                    eprintln!("{}", coordinator.display_warning(&format!(".env {}", warning))?);
                }
            }
        }

        if config.show_catalog {
            let definitions = catalog(&config.endpoints(), config.packet_size);
            println!("{}", coordinator.display_catalog(&definitions)?);
            return Ok(());
        }

        let runner = ProbeRunner::new(RunnerOptions::from(&config))?
            .with_logger(factory.create_probe_logger().await);

        let (handle, signal) = CancelSignal::new();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                handle.cancel();
            }
        });

        let (run, analysis) = execute(&runner, &config, &signal).await;
        if signal.is_cancelled() {
            logger
                .warn("Interrupted; unfinished probes are reported as timeout")
                .correlation_id(&run.run_id)
                .log()
                .await;
        }

        logger
            .info("Analysis complete")
            .correlation_id(&run.run_id)
            .field("score_transition", analysis.score_transition)
            .field("score_strict", analysis.score_strict)
            .field("tokens", analysis.token_names())
            .log()
            .await;

        println!("{}", coordinator.display_report(&run, &analysis)?);
        Ok(())
    }
}

/// Run the configured probes and analyze the outcome
pub async fn execute(runner: &ProbeRunner, config: &Config, cancel: &CancelSignal) -> (RunResult, Analysis) {
    let run = runner
        .run_with_cancel(&config.probes(), &RunOverrides::default(), cancel)
        .await;
    let analysis = analyze(&run);
    (run, analysis)
}
