use token_sms::cmd;
use tracing::{debug, warn};

fn main() {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::Level::INFO.into())
                .from_env_lossy(),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    // A missing .env is fine, the process environment and flags still apply
    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Ignoring unreadable .env file: {e}"),
    }

    match cmd::Cli::run() {
        Ok(report) => std::process::exit(report.exit_code()),
        Err(e) => {
            eprintln!("Oops! {}", e.inner);

            let mut source = e.inner.source();
            if source.is_some() {
                eprintln!("\nCaused by:");
                let mut index = 0;
                while let Some(err) = source {
                    eprintln!("    {index}: {err}");
                    source = err.source();
                    index += 1;
                }
            }

            if let Some(hint) = e.hint {
                eprintln!();
                eprintln!("{hint}");
            }
            std::process::exit(1);
        }
    }
}
