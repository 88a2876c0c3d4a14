//! Tutor Console
//!
//! Terminal host for the tutor voice core. Plain lines are typed questions;
//! `/say <text>` simulates a spoken question (partials, then a final result)
//! so the confirmation countdown and spoken answers can be exercised without
//! a microphone.

mod host;

use anyhow::Context;
use host::{ConsoleRecognizer, ConsoleSynthesizer};
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tutor_voice::{
    create_best_completion, ControllerOutput, Language, Phase, Role, TurnController, TutorConfig,
    UserCommand, VoiceGender, VoiceOrchestrator,
};

const HELP: &str = "\
Type a question and press Enter, or:
  /say <text>        ask aloud (simulated microphone)
  /send              send the pending spoken question now
  /cancel            discard the pending spoken question
  /stop              stop speaking
  /play              play an answer the host refused to autoplay
  /lang <language>   English, Telugu, Hindi (Urdu if configured)
  /voice <gender>    female or male
  /autospeak on|off  speak answers to spoken questions
  /reset             clear the chat
  /quit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[tutor-console] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = TutorConfig::load().context("load tutor config")?;
    tracing::info!(language = %config.language, countdown_secs = config.confirmation_window_secs, "Tutor console starting");

    let (callbacks_tx, mut callbacks_rx) = mpsc::unbounded_channel();
    let (scripts_tx, scripts_rx) = mpsc::unbounded_channel();
    let (controller, outputs) = TurnController::new(
        config,
        ConsoleRecognizer::new(callbacks_tx.clone(), scripts_rx),
        ConsoleSynthesizer::new(callbacks_tx),
    );
    let (observer_tx, observer_rx) = mpsc::unbounded_channel();
    let (orchestrator, handle) =
        VoiceOrchestrator::new(controller, outputs, create_best_completion(), observer_tx);
    let voice_loop = tokio::spawn(orchestrator.run());

    // Recognizer and synthesizer callbacks reach the loop like any other host event.
    let forward = handle.clone();
    tokio::spawn(async move {
        while let Some(event) = callbacks_rx.recv().await {
            if forward.event(event).is_err() {
                break;
            }
        }
    });
    tokio::spawn(render(observer_rx));

    println!("📚 Tutor console. /help for commands.");
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("read stdin")? else {
                    break;
                };
                match parse_line(&line) {
                    Ok(Some(Input::Quit)) => break,
                    Ok(Some(Input::Help)) => println!("{}", HELP),
                    Ok(Some(Input::Say(text))) => {
                        scripts_tx.send(text).context("queue spoken question")?;
                        handle.command(UserCommand::StartCapture)?;
                    }
                    Ok(Some(Input::Command(command))) => handle.command(command)?,
                    Ok(None) => {}
                    Err(msg) => println!("⚠️  {}", msg),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("CTRL-C received; shutting down");
                break;
            }
        }
    }

    handle.command(UserCommand::Shutdown)?;
    let controller = voice_loop.await.context("voice loop panicked")??;
    println!("👋 {} messages this session.", controller.log().len());
    Ok(())
}

#[derive(Debug)]
enum Input {
    Command(UserCommand),
    Say(String),
    Help,
    Quit,
}

fn parse_line(line: &str) -> Result<Option<Input>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    if !line.starts_with('/') {
        return Ok(Some(Input::Command(UserCommand::SubmitTyped(line.to_string()))));
    }

    let (cmd, arg) = line.split_once(' ').unwrap_or((line, ""));
    let arg = arg.trim();
    let input = match cmd {
        "/say" if !arg.is_empty() => Input::Say(arg.to_string()),
        "/say" => return Err("usage: /say <question>".to_string()),
        "/send" => Input::Command(UserCommand::ConfirmNow),
        "/cancel" => Input::Command(UserCommand::CancelTranscript),
        "/stop" => Input::Command(UserCommand::StopPlayback),
        "/play" => Input::Command(UserCommand::PlayBlocked),
        "/lang" => {
            let language: Language = arg.parse().map_err(|e| format!("{}", e))?;
            Input::Command(UserCommand::SetLanguage(language))
        }
        "/voice" => {
            let gender: VoiceGender = arg.parse().map_err(|e| format!("{}", e))?;
            Input::Command(UserCommand::SetVoiceGender(gender))
        }
        "/autospeak" => match arg {
            "on" => Input::Command(UserCommand::SetAutoSpeak(true)),
            "off" => Input::Command(UserCommand::SetAutoSpeak(false)),
            _ => return Err("usage: /autospeak on|off".to_string()),
        },
        "/reset" => Input::Command(UserCommand::ResetChat),
        "/help" => Input::Help,
        "/quit" | "/exit" => Input::Quit,
        other => return Err(format!("unknown command {} (try /help)", other)),
    };
    Ok(Some(input))
}

async fn render(mut outputs: mpsc::UnboundedReceiver<ControllerOutput>) {
    while let Some(output) = outputs.recv().await {
        match output {
            ControllerOutput::PhaseChanged { to, .. } => {
                if to == Phase::Sending {
                    println!("📨 sending...");
                }
            }
            ControllerOutput::LivePreview(text) => println!("   … {}", text),
            ControllerOutput::CountdownStarted { seconds } => {
                println!("⏳ sending in {}s (/send to send now, /cancel to discard)", seconds)
            }
            ControllerOutput::Status(status) => println!("ℹ️  {}", status),
            ControllerOutput::TurnAppended(turn) => match turn.role {
                Role::User => println!("🧑 You: {}", turn.content),
                Role::Assistant if turn.is_error => println!("⚠️  Tutor: {}", turn.content),
                Role::Assistant => println!("🤖 Tutor: {}", turn.content),
            },
            ControllerOutput::ManualPlayAvailable { .. } => {
                println!("▶️  Autoplay was blocked. Type /play to hear the answer.")
            }
            ControllerOutput::ChunkSpoken { .. }
            | ControllerOutput::Dispatch { .. }
            | ControllerOutput::ScheduleTimer { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_typed_questions() {
        match parse_line("  Explain democracy ") {
            Ok(Some(Input::Command(UserCommand::SubmitTyped(text)))) => {
                assert_eq!(text, "Explain democracy")
            }
            _ => panic!("expected a typed question"),
        }
        assert!(matches!(parse_line("   "), Ok(None)));
    }

    #[test]
    fn slash_commands_parse() {
        assert!(matches!(parse_line("/say What is photosynthesis"), Ok(Some(Input::Say(_)))));
        assert!(matches!(
            parse_line("/lang telugu"),
            Ok(Some(Input::Command(UserCommand::SetLanguage(Language::Telugu))))
        ));
        assert!(matches!(
            parse_line("/voice male"),
            Ok(Some(Input::Command(UserCommand::SetVoiceGender(VoiceGender::Male))))
        ));
        assert!(matches!(parse_line("/quit"), Ok(Some(Input::Quit))));
    }

    #[test]
    fn bad_commands_explain_themselves() {
        assert!(parse_line("/say").is_err());
        assert!(parse_line("/autospeak maybe").is_err());
        assert!(parse_line("/lang klingon").is_err());
        assert!(parse_line("/dance").unwrap_err().contains("/help"));
    }
}
