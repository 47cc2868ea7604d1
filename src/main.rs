use ai_cmd::app::App;
use ai_cmd::cli::{self, CliArgs};
use ai_cmd::config::Config;
use ai_cmd::error::AppError;
use ai_cmd::executor::Executor;
use ai_cmd::http_client::ReqwestHttpClient;
use ai_cmd::interrupt::{Interrupts, Phase};
use ai_cmd::{report, selector};
use std::io::{self, Write};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_tracing();

    let args = match cli::parse_from(std::env::args_os()) {
        Ok(args) => args,
        Err(e) => e.exit(),
    };

    let code = match run(args).await {
        Ok(()) => 0,
        Err(e) => {
            if let Some(message) = e.user_message() {
                eprintln!("{}", message);
            }
            e.exit_code()
        }
    };
    std::process::exit(code);
}

// Logs go to stderr; stdout carries the selector and the echoed command.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run(args: CliArgs) -> Result<(), AppError> {
    let config = Config::load().map_err(AppError::Config)?;

    if args.show_config {
        config.show_config_info().map_err(AppError::Config)?;
        return Ok(());
    }

    let task = args
        .task
        .ok_or_else(|| AppError::Usage("no task given".to_string()))?;
    let app = App::new(&config, Arc::new(ReqwestHttpClient::new()))?;

    let interrupts = Interrupts::install();
    let outcome = app.generate(&task, args.count, interrupts.token()).await?;

    interrupts.enter(Phase::Selecting);
    let mut stdout = io::stdout();
    if args.verbose {
        report::print_verbose(&outcome, &mut stdout)?;
    }
    let choice = selector::select_command(&outcome.aggregated.commands)?;

    // Echo the command for transparency
    writeln!(stdout, "{}", choice)?;
    stdout.flush()?;

    interrupts.enter(Phase::Executing);
    info!("Running selected command: {}", choice);
    Executor::from_env().execute(&choice)
}
