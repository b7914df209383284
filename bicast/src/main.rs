//! bicast - post one message to Twitter/X and Nostr

use std::path::PathBuf;

use clap::Parser;
use libbicast::{
    create_platforms, load_encrypted, Broadcaster, Decryptor, Result, TargetSelection,
};

#[derive(Parser, Debug)]
#[command(name = "bicast")]
#[command(about = "Broadcast a message to Twitter/X and Nostr", long_about = None)]
struct Cli {
    /// Post to Twitter/X only
    #[arg(long)]
    twitter: bool,

    /// Post to Nostr only
    #[arg(long)]
    nostr: bool,

    /// Path to the encrypted credentials file
    #[arg(long, env = "BICAST_CREDENTIALS")]
    credentials: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// The message to post, one or more words
    #[arg(required = true)]
    message: Vec<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    libbicast::logging::init(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    let message = cli.message.join(" ");

    let encrypted = match cli.credentials {
        Some(path) => path,
        None => libbicast::config::resolve_credentials_path()?,
    };

    // Fatal path: missing file, decryption failure or parse failure all
    // abort before any publish attempt. The decrypted plaintext is gone
    // by the time this returns, success or not.
    let credentials = load_encrypted(&encrypted, &Decryptor::new())?;

    let selection = TargetSelection::from_flags(cli.twitter, cli.nostr);
    let mut broadcaster = Broadcaster::new(create_platforms(&credentials, selection));

    // Publisher failures are reported per platform and never change the
    // exit status.
    for outcome in broadcaster.broadcast(&message).await {
        if outcome.success {
            println!(
                "{}: posted ({})",
                outcome.platform,
                outcome.post_id.as_deref().unwrap_or("unknown id")
            );
        } else {
            eprintln!(
                "{}: failed: {}",
                outcome.platform,
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}
