use autoform_lib::cli::{self, Args};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    // `log` records from autoform-otp are bridged into tracing by `init()`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut stdout = std::io::stdout().lock();
    let exit_code = match cli::run(args, &mut stdout) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("autoform-hotp error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}
