//! Interactive chatbot command.

use std::io::Write;
use std::path::Path;

use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};

use lexishield::{AnalysisMode, AnalysisSession, Config};

use crate::cli::helpers::{
    open_document, print_result, print_transcript, print_turn, report, with_spinner,
};
use crate::cli::icons::{dim_arrow, warn};

fn help() -> String {
    let modes: Vec<&str> = AnalysisMode::SINGLE_SHOT.iter().map(|m| m.as_str()).collect();
    format!("Commands: /mode <{}>, /history, /help, /quit", modes.join("|"))
}

/// One line of chat input.
#[derive(Debug, PartialEq, Eq)]
enum ChatInput {
    Ask(String),
    Mode(AnalysisMode),
    History,
    Help,
    Quit,
    Blank,
    Invalid(String),
}

impl ChatInput {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Blank;
        }
        let Some(command) = line.strip_prefix('/') else {
            return Self::Ask(line.to_string());
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };
        match name {
            "quit" | "exit" | "q" => Self::Quit,
            "history" => Self::History,
            "help" => Self::Help,
            "mode" if arg.is_empty() => Self::Invalid("/mode needs an analysis name".to_string()),
            "mode" => match arg.parse() {
                Ok(mode) => Self::Mode(mode),
                Err(e) => Self::Invalid(format!("{}", e)),
            },
            other => Self::Invalid(format!("Unknown command /{}", other)),
        }
    }
}

/// Extract a PDF and answer questions about it until `/quit` or end of input.
pub async fn cmd_chat(config: &Config, file: &Path) -> anyhow::Result<()> {
    let session = open_document(config, file).await?;
    session.switch_mode(AnalysisMode::Chatbot)?;

    let name = session.snapshot().document_name.unwrap_or_default();
    println!(
        "\n{} {}",
        style(AnalysisMode::Chatbot.display_name()).bold().cyan(),
        style(format!("({})", name)).dim()
    );
    println!("{}", style(help()).dim());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match ChatInput::parse(&line) {
            ChatInput::Blank => continue,
            ChatInput::Quit => break,
            ChatInput::Help => println!("{}", style(help()).dim()),
            ChatInput::History => print_transcript(&session.conversation_history()),
            ChatInput::Invalid(message) => eprintln!("{} {}", warn(), message),
            ChatInput::Mode(mode) if mode.is_chatbot() => {
                session.switch_mode(mode)?;
                eprintln!("{} Back to questions", dim_arrow());
            }
            ChatInput::Mode(mode) => run_single_shot(&session, mode).await,
            ChatInput::Ask(question) => ask(&session, question).await,
        }
    }

    Ok(())
}

fn prompt() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{} ", style(">").green().bold())?;
    stdout.flush()
}

async fn ask(session: &AnalysisSession, question: String) {
    session.set_question_input(question);
    match with_spinner("Thinking...", session.run_analysis(AnalysisMode::Chatbot, None)).await {
        Ok(()) => {
            if let Some(answer) = session.conversation_history().last() {
                print_turn(answer);
            }
        }
        Err(e) => report(&e),
    }
}

async fn run_single_shot(session: &AnalysisSession, mode: AnalysisMode) {
    let message = format!("{}...", mode.display_name());
    match with_spinner(message, session.run_analysis(mode, None)).await {
        Ok(()) => {
            if let Some(text) = session.analysis_result() {
                print_result(mode, &text);
            }
        }
        Err(e) => report(&e),
    }
}
