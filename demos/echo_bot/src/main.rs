//! Echo Bot Demo
//!
//! Runs a [`ViberConnector`] without a network: webhook callbacks are read
//! from stdin, one JSON document per line, and every message the bot sends
//! is printed to stdout as `{"receiver": ..., "message": ...}`.
//!
//! # Commands
//!
//! - `/help`: list commands
//! - `/menu`: reply with a keyboard
//! - `/carousel`: reply with a two-card carousel
//! - anything else: echoed back; pictures are sent back as pictures
//!
//! # Usage
//!
//! ```bash
//! echo '{"event":"message","timestamp":1,"sender":{"id":"u1=","name":"Ann"},"message":{"type":"text","text":"/menu"}}' \
//!     | cargo run --package echo-bot -- --name "Echo"
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use vibra_adapter_viber::convert::{HERO_CARD_CONTENT_TYPE, KEYBOARD_CONTENT_TYPE};
use vibra_adapter_viber::{PlatformMessage, PlatformTransport, UserProfile, ViberConnector};
use vibra_core::{
    Attachment, AttachmentLayout, Connector, Envelope, TransportError, TransportResult,
};
use vibra_runtime::{ConfigLoader, LogOutput, logging, validate_config};

const HELP: &str = "Commands: /help, /menu, /carousel. Anything else is echoed back.";

#[derive(Debug, Parser)]
#[command(about = "Echo bot for the Vibra Viber connector")]
struct Args {
    /// Configuration file (defaults to searching for vibra.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides the bot display name.
    #[arg(long)]
    name: Option<String>,
}

// ============================================================================
// Transport
// ============================================================================

/// Prints every outgoing message as a JSON line.
struct StdoutTransport;

#[async_trait]
impl PlatformTransport for StdoutTransport {
    async fn send_message(
        &self,
        recipient: &UserProfile,
        message: &PlatformMessage,
    ) -> TransportResult<()> {
        let line = serde_json::to_string(&json!({
            "receiver": recipient.id,
            "message": message,
        }))
        .map_err(|e| TransportError::SendFailed(e.to_string()))?;
        println!("{line}");
        Ok(())
    }
}

// ============================================================================
// Replies
// ============================================================================

fn replies_for(inbound: &Envelope) -> Vec<Envelope> {
    let reply = inbound.reply();
    let typing = Envelope::typing().with_address(reply.address().cloned().unwrap_or_default());

    let reply = match inbound.text().trim() {
        "/help" => reply.with_text(HELP),
        "/menu" => reply.with_text("Pick a color").with_attachment(Attachment::new(
            KEYBOARD_CONTENT_TYPE,
            json!({"buttons": [
                {"type": "imBack", "title": "Red", "value": "red"},
                {"type": "imBack", "title": "Green", "value": "green"},
                {"type": "imBack", "title": "Blue", "value": "blue"}
            ]}),
        )),
        "/carousel" => reply
            .with_text("Today's picks")
            .with_layout(AttachmentLayout::Carousel)
            .with_attachment(card("Sneakers", "http://example.com/sneakers.png", "sneakers"))
            .with_attachment(card("Boots", "http://example.com/boots.png", "boots")),
        text => {
            let echoed = reply.with_text(text);
            match inbound.attachments().first() {
                Some(picture) if picture.content_type.starts_with("image/") => {
                    echoed.with_attachment(picture.clone())
                }
                _ => echoed,
            }
        }
    };

    vec![typing, reply]
}

fn card(title: &str, image: &str, value: &str) -> Attachment {
    Attachment::new(
        HERO_CARD_CONTENT_TYPE,
        json!({
            "title": title,
            "subtitle": "In stock",
            "images": [{"url": image}],
            "buttons": [
                {"type": "imBack", "title": "Buy", "value": format!("buy {value}")},
                {"type": "openUrl", "title": "Details", "value": format!("http://example.com/{value}")}
            ]
        }),
    )
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        loader = loader.file(path);
    }
    let mut config = loader.load()?;
    if let Some(name) = args.name {
        config.viber.name = name;
    }
    // Stdout carries the outgoing messages.
    if config.logging.output == LogOutput::Stdout {
        config.logging.output = LogOutput::Stderr;
    }
    validate_config(&config)?;
    logging::init_from_config(&config.logging);

    let connector = Arc::new(ViberConnector::new(config.viber, Arc::new(StdoutTransport)));
    info!(
        name = %connector.config().name,
        bot_id = %connector.config().bot_id,
        "Starting echo bot"
    );

    let (tx, mut rx) = mpsc::unbounded_channel();
    connector.on_event(Arc::new(move |envelopes: Vec<Envelope>| {
        for envelope in envelopes {
            let _ = tx.send(envelope);
        }
    }));

    let replier = {
        let connector = connector.clone();
        tokio::spawn(async move {
            while let Some(inbound) = rx.recv().await {
                let report = connector.send(replies_for(&inbound)).await;
                for (position, e) in report.failures() {
                    error!(position, error = %e, "Reply failed");
                }
            }
        })
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        if let Err(e) = connector.handle_callback(line.as_bytes()) {
            warn!(error = %e, "Ignoring malformed callback");
        }
    }

    // Dropping the forwarding handler closes the channel.
    connector.on_event(Arc::new(|_: Vec<Envelope>| {}));
    replier.await?;

    info!("Input closed, shutting down");
    Ok(())
}
