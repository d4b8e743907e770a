use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{self, Write};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::chat::{ChatEvent, ChatSession, ConnectionState, Transcript};
use crate::core::AppConfig;

pub async fn run(config: &AppConfig) -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=warn", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut rl = DefaultEditor::new().expect("Editor failed");

    let (session, mut events) = ChatSession::connect(config);

    // Wait for the socket before accepting input
    println!("Connecting to {}...", config.chat_ws_url());
    let mut state = session.subscribe_state();
    state
        .wait_for(|current| *current == ConnectionState::Connected)
        .await?;
    println!("Connected. Ctrl-C or Ctrl-D to quit.");

    let mut transcript = Transcript::new();

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                // Drop connection churn that happened while idle at the prompt
                while events.try_recv().is_ok() {}

                if let Err(err) = session.send(line) {
                    println!("{}", err);
                    continue;
                }
                transcript.push_user(line);

                // Stream the reply until the turn ends
                while let Some(event) = events.recv().await {
                    match event {
                        ChatEvent::Chunk(text) => {
                            print!("{}", text);
                            io::stdout().flush()?;
                            transcript.apply_chunk(&text);
                        }
                        ChatEvent::Sources(sources) => {
                            transcript.apply_sources(sources);
                        }
                        ChatEvent::Done => {
                            println!();
                            transcript.finish_turn();
                            if let Some(reply) = transcript.last() {
                                for source in &reply.sources {
                                    println!("  source: {} {}", source.title, source.url);
                                }
                            }
                            break;
                        }
                        ChatEvent::Error(message) => {
                            println!("Error: {}", message);
                            transcript.apply_error(&message);
                            break;
                        }
                        ChatEvent::Disconnected => {
                            println!("Connection lost, reconnecting...");
                            break;
                        }
                        ChatEvent::Connected => {}
                    }
                }
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    session.shutdown().await;

    Ok(())
}
