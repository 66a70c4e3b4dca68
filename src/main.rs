/**
 * iad-verify CLI
 * Submits one biometric verification bundle and prints the raw server response
 */

use clap::Parser;
use iad_verify::{ClientConfig, RedactionPolicy, VerificationClient, VerificationRequest};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "iad-verify", version, about = "Submit a biometric verification bundle")]
struct Opt {
    /// Base address of the verification server, e.g. `https://iad.example.com/api`.
    #[arg(long, env = "IAD_SERVER_URL")]
    server: String,

    /// Encrypted capture bundle to upload.
    #[arg(long)]
    bundle: PathBuf,

    /// Optional JPEG sent alongside the bundle.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Access token. The `Bearer ` scheme is added when missing.
    #[arg(long, env = "IAD_AUTH_TOKEN", hide_env_values = true)]
    token: String,

    #[arg(long)]
    template_id: String,

    #[arg(long)]
    verification_id: String,

    /// Log connection-level traffic. This includes the Authorization header.
    #[arg(long, env = "IAD_VERBOSE_TRACING")]
    verbose_tracing: bool,

    /// Log the Authorization header unredacted.
    #[arg(long, env = "IAD_REVEAL_CREDENTIALS")]
    reveal_credentials: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Verification(#[from] iad_verify::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let opt = Opt::parse();

    match run(opt).await {
        Ok(body) => {
            println!("{}", body);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Verification failed: {}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(opt: Opt) -> Result<String, CliError> {
    let redaction = if opt.reveal_credentials {
        RedactionPolicy::Reveal
    } else {
        RedactionPolicy::Redact
    };
    let config = ClientConfig::new(&opt.server)?
        .with_verbose_tracing(opt.verbose_tracing)
        .with_redaction(redaction);
    let client = VerificationClient::with_config(config)?;

    let bundle = read_file(opt.bundle).await?;
    let mut request =
        VerificationRequest::new(bundle, opt.token, opt.template_id, opt.verification_id);
    if let Some(path) = opt.image {
        request = request.with_jpeg_image(read_file(path).await?);
    }

    info!(
        "Loaded capture: bundle_len={}, has_image={}",
        request.encrypted_bundle.len(),
        request.jpeg_image.is_some()
    );

    Ok(client.send(&request).await?)
}

async fn read_file(path: PathBuf) -> Result<Vec<u8>, CliError> {
    tokio::fs::read(&path)
        .await
        .map_err(|source| CliError::Read { path, source })
}
