//! Chat REPL for the specialist chatbot.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::future::Future;

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tokio_util::sync::CancellationToken;

use escriba_core::conversation::{ConversationController, SubmitOutcome, Turn};
use escriba_core::markdown::project;
use escriba_core::plan::{Plan, UsageCounters};
use escriba_core::progress::StagedReveal;
use escriba_interaction::{SessionGuard, SessionStore};

use crate::render;

/// Starter questions shown while the transcript is empty.
const STARTER_QUESTIONS: [&str; 4] = [
    "Quais são os requisitos para registro de imóvel?",
    "Como funciona a qualificação registral?",
    "Explique sobre usucapião extrajudicial",
    "O que é uma matrícula imobiliária?",
];

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct ChatHelper {
    commands: Vec<String>,
}

impl ChatHelper {
    fn new() -> Self {
        Self {
            commands: vec!["/regenerar".to_string(), "/sair".to_string()],
        }
    }
}

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for ChatHelper {}

/// Runs an operation with the staged "thinking" reveal alongside it.
///
/// The reveal's remaining timers are cancelled the moment the operation
/// resolves, so the indicator never outlives the real call.
async fn with_reveal<F, Fut>(operation: F) -> SubmitOutcome
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = SubmitOutcome>,
{
    let cancel = CancellationToken::new();
    let reveal = tokio::spawn(StagedReveal::standard().run(
        cancel.clone(),
        |_, step| println!("{}", step.label.dimmed()),
        || {},
    ));

    let outcome = operation().await;

    cancel.cancel();
    let _ = reveal.await;
    outcome
}

/// Resolves a numeric choice against the current suggestions: the starter
/// questions on an empty transcript, the last answer's follow-ups after.
async fn suggestion_for(controller: &ConversationController, choice: usize) -> Option<String> {
    if choice == 0 {
        return None;
    }
    let transcript = controller.transcript().await;
    if transcript.is_empty() {
        return STARTER_QUESTIONS.get(choice - 1).map(|s| s.to_string());
    }
    transcript
        .iter()
        .rev()
        .find(|turn| !turn.follow_ups.is_empty())
        .and_then(|turn| turn.follow_ups.get(choice - 1).cloned())
}

fn print_assistant_turn(turn: &Turn) {
    println!("{}", render::render_blocks(&project(&turn.content)));
    let sources = render::render_sources(&turn.sources);
    if !sources.is_empty() {
        println!("{sources}");
    }
    let follow_ups = render::render_follow_ups(&turn.follow_ups);
    if !follow_ups.is_empty() {
        println!("{follow_ups}");
    }
}

/// The main chat REPL loop.
pub async fn run(
    controller: &ConversationController,
    store: &SessionStore,
    plan: Plan,
) -> anyhow::Result<()> {
    let mut usage = UsageCounters::default();

    let helper = ChatHelper::new();
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));

    println!("{}", "=== Chatbot Especialista ===".bright_magenta().bold());
    println!(
        "{}",
        "Legislação Cartorial Brasileira — '/regenerar' refaz a última resposta, '/sair' encerra."
            .bright_black()
    );
    println!("{}", usage.chat_display(plan).bright_black());
    println!();
    println!("{}", "Como posso ajudar?".bold());
    for (index, question) in STARTER_QUESTIONS.iter().enumerate() {
        println!("  [{}] {}", index + 1, question);
    }
    println!();

    loop {
        // The hosted session can end at any time; re-check before every
        // question and send the person back to the auth entry point.
        if let Err(err) = SessionGuard::require(store) {
            println!("{}", err.to_string().red());
            break;
        }

        let readline = rl.readline("> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed.is_empty() {
                    continue;
                }
                if trimmed == "/sair" {
                    println!("{}", "Até logo!".bright_green());
                    break;
                }

                let _ = rl.add_history_entry(&line);

                let outcome = if trimmed == "/regenerar" {
                    with_reveal(|| controller.regenerate_last()).await
                } else if let Ok(choice) = trimmed.parse::<usize>() {
                    match suggestion_for(controller, choice).await {
                        Some(suggestion) => {
                            println!("{}", format!("> {suggestion}").green());
                            with_reveal(|| controller.select_follow_up(suggestion)).await
                        }
                        None => {
                            println!("{}", "Nenhuma sugestão com esse número.".bright_black());
                            continue;
                        }
                    }
                } else {
                    controller.set_draft(trimmed).await;
                    with_reveal(|| controller.submit()).await
                };

                match outcome {
                    SubmitOutcome::Answered => {
                        if let Some(turn) = controller.transcript().await.last() {
                            print_assistant_turn(turn);
                        }
                        usage.record_chat();
                        println!("{}", usage.chat_display(plan).bright_black());
                    }
                    SubmitOutcome::Failed { notice } => {
                        println!(
                            "{}",
                            format!("Erro ao enviar mensagem: {notice} — tente novamente.").red()
                        );
                    }
                    SubmitOutcome::Ignored => {}
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("{}", "Até logo!".bright_green());
                break;
            }
            Err(err) => {
                println!("{}", format!("Erro de leitura: {err:?}").red());
                break;
            }
        }
    }

    Ok(())
}
