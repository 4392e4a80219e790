//! Print a channel's chat to stdout.
//!
//! ```text
//! cargo run --example watch_chat -- twitch forsen
//! cargo run --example watch_chat -- kick xqc
//! RUST_LOG=unichat=debug cargo run --example watch_chat -- twitch forsen
//! ```

use anyhow::{bail, Context};
use tracing_subscriber::EnvFilter;
use unichat::config::{KickConfig, TwitchConfig};
use unichat::{ChatMessage, ClearMessages, KickClient, PlatformEvent, TwitchClient};

fn print_message(m: &ChatMessage) {
    println!("[{}] {}: {}", m.channel.name, m.user.display_name, m.raw_text);
}

fn print_clear(c: &ClearMessages) {
    match &c.user {
        Some(user) => println!("[{}] -- {} was cleared", c.channel.name, user.username),
        None => println!("[{}] -- chat cleared", c.channel.name),
    }
}

fn print_event(e: &PlatformEvent) {
    println!("[{}] ** {}", e.channel.name, e.system_message);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let platform = args.next().context("usage: watch_chat <twitch|kick> <channel>")?;
    let channel = args.next().context("missing channel name")?;

    match platform.as_str() {
        "twitch" => {
            let mut client = TwitchClient::new(TwitchConfig::anonymous(channel));
            client.on_message(print_message);
            client.on_clear_messages(print_clear);
            client.on_event(print_event);
            client.connect(None).await?;
            client.run().await?;
        }
        "kick" => {
            let mut client = KickClient::new(KickConfig::channel(channel));
            client.on_message(print_message);
            client.connect(None).await?;
            client.run().await?;
        }
        other => bail!("unknown platform {other:?}"),
    }

    Ok(())
}
