//! Stdio bridge host for the editing surface.
//!
//! Reads newline-delimited JSON on stdin, both host commands (`"command"`
//! envelope) and input events (`"event"` envelope), drives one
//! [`EditorSession`], and writes outbound bridge messages as JSON lines
//! on stdout. A frame timer supplies the animation-frame and wall-clock
//! callbacks the session expects.

use anyhow::Result;
use loupe_common::ResizeDirection;
use loupe_engine::{EditorSession, EngineConfig, KeyEvent, PointerEvent};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Input events forwarded by the host's render layer.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
enum InputEvent {
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    PointerUp(PointerEvent),
    PointerCancel(PointerEvent),
    #[serde(rename_all = "camelCase")]
    ResizeStart {
        direction: ResizeDirection,
        pointer: PointerEvent,
    },
    KeyDown(KeyEvent),
    TextInput {
        text: String,
    },
    Blur,
    WindowResized,
    #[serde(rename_all = "camelCase")]
    Scrolled {
        file: String,
        line: u32,
    },
    SelectBreadcrumb {
        index: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    let mut frame_ms: u64 = 16;
    let mut config = EngineConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--frame-ms" => {
                if i + 1 < args.len() {
                    frame_ms = args[i + 1].parse()?;
                    i += 2;
                } else {
                    eprintln!("--frame-ms requires a value");
                    std::process::exit(1);
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    let text = std::fs::read_to_string(&args[i + 1])?;
                    config = serde_json::from_str(&text)?;
                    i += 2;
                } else {
                    eprintln!("--config requires a path");
                    std::process::exit(1);
                }
            }
            "--help" | "-h" => {
                println!("Usage: loupe-surface [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>   Engine configuration file (JSON)");
                println!("  --frame-ms <MS>       Frame interval in milliseconds (default: 16)");
                println!("  -h, --help            Show this help message");
                std::process::exit(0);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                std::process::exit(1);
            }
        }
    }

    tracing::info!(frame_ms, "surface started");

    let mut session = EditorSession::new(config);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut frame = tokio::time::interval(Duration::from_millis(frame_ms.max(1)));
    let started = Instant::now();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        let line = line.trim();
                        if !line.is_empty() {
                            dispatch(&mut session, line);
                        }
                    }
                    // Host hung up
                    None => break,
                }
            }
            _ = frame.tick() => {
                session.advance(started.elapsed().as_millis() as u64);
                session.run_frame();
            }
        }

        for msg in session.drain_outbox() {
            let mut json = serde_json::to_string(&msg)?;
            json.push('\n');
            stdout.write_all(json.as_bytes()).await?;
        }
        stdout.flush().await?;
    }

    session.close();
    Ok(())
}

/// One stdin line: an input event, or else a bridge command. Anything
/// unrecognized is dropped by the session.
fn dispatch(session: &mut EditorSession, line: &str) {
    match serde_json::from_str::<InputEvent>(line) {
        Ok(event) => apply(session, event),
        Err(_) => session.handle_raw_message(line),
    }
}

fn apply(session: &mut EditorSession, event: InputEvent) {
    match event {
        InputEvent::PointerDown(ev) => session.pointer_down(ev),
        InputEvent::PointerMove(ev) => session.pointer_move(ev),
        InputEvent::PointerUp(ev) => session.pointer_up(ev),
        InputEvent::PointerCancel(ev) => session.pointer_cancel(ev),
        InputEvent::ResizeStart { direction, pointer } => {
            session.resize_start(direction, pointer)
        }
        InputEvent::KeyDown(ev) => session.key_down(ev),
        InputEvent::TextInput { text } => session.text_input(&text),
        InputEvent::Blur => session.blur(),
        InputEvent::WindowResized => session.window_resized(),
        InputEvent::Scrolled { file, line } => {
            if let Some(node) = session.document().find_by_line(&file, line) {
                session.scrolled(node);
            }
        }
        InputEvent::SelectBreadcrumb { index } => session.select_breadcrumb(index),
    }
}
