mod chat;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use escriba_core::analyzer::{DocumentAnalyzer, DocumentUpload};
use escriba_core::config::BackendConfig;
use escriba_core::conversation::ConversationController;
use escriba_core::gems::builtin_gems;
use escriba_core::plan::{Plan, UsageCounters};
use escriba_interaction::{
    AuthClient, DemoAccessClient, HostedAnswerAgent, SessionGuard, SessionStore, SessionStorage,
    SimulatedAnalyzer,
};

#[derive(Parser)]
#[command(name = "escriba", version, about = "Assistente de IA para cartórios")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Entra com email e senha
    Login { email: String },
    /// Encerra a sessão local
    Logout,
    /// Abre o chatbot especialista
    Chat,
    /// Analisa um documento (PDF, JPG ou PNG)
    Analyze { file: PathBuf },
    /// Lista os GEMS pré-construídos
    Gems,
    /// Cria uma conta demo e entra com ela
    Demo,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = match BackendConfig::load() {
        Ok(config) => config,
        Err(err) => {
            println!("{}", err.to_string().red());
            println!(
                "{}",
                "Configure o backend em ~/.config/escriba/config.toml (base_url, anon_key)."
                    .bright_black()
            );
            return Ok(());
        }
    };

    let store = SessionStore::new();
    let storage = SessionStorage::new()?;
    if let Ok(Some(session)) = storage.load() {
        store.set(session);
    }

    // Every failure is a notification, never a crash: report and return.
    let result = match cli.command {
        Command::Login { email } => login(&config, &store, &storage, &email).await,
        Command::Logout => logout(&config, &store, &storage),
        Command::Chat => run_chat(&config, &store).await,
        Command::Analyze { file } => analyze(&store, &file).await,
        Command::Gems => list_gems(&store),
        Command::Demo => demo(&config, &store, &storage).await,
    };

    if let Err(err) = result {
        println!("{}", err.to_string().red());
    }

    Ok(())
}

async fn login(
    config: &BackendConfig,
    store: &SessionStore,
    storage: &SessionStorage,
    email: &str,
) -> Result<()> {
    let mut rl = rustyline::DefaultEditor::new()?;
    let password = rl.readline("Senha: ")?;

    let client = AuthClient::new(config.clone())?;
    let session = client.sign_in(store, email, password.trim()).await?;
    storage.save(&session)?;

    println!(
        "{}",
        format!("Bem-vindo, {}!", session.user.email).bright_green()
    );
    Ok(())
}

fn logout(config: &BackendConfig, store: &SessionStore, storage: &SessionStorage) -> Result<()> {
    let client = AuthClient::new(config.clone())?;
    client.sign_out(store);
    storage.clear()?;
    println!("{}", "Sessão encerrada.".bright_green());
    Ok(())
}

async fn run_chat(config: &BackendConfig, store: &SessionStore) -> Result<()> {
    let session = SessionGuard::require(store)?;
    let agent = HostedAnswerAgent::from_config(config)?.with_access_token(session.access_token);
    let controller = ConversationController::new(Arc::new(agent));
    chat::run(&controller, store, Plan::Free).await
}

async fn analyze(store: &SessionStore, file: &PathBuf) -> Result<()> {
    SessionGuard::require(store)?;

    let metadata = std::fs::metadata(file)?;
    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let upload = DocumentUpload::from_path_hint(file_name, metadata.len())?;

    println!(
        "{}",
        format!("Analisando {}...", upload.file_name()).bright_black()
    );
    let analyzer = SimulatedAnalyzer::new();
    let report = analyzer.analyze(&upload).await?;

    println!("{}", render::render_report(&report));
    let mut usage = UsageCounters::default();
    usage.record_analysis();
    println!("{}", usage.analysis_display(Plan::Free).bright_black());
    Ok(())
}

fn list_gems(store: &SessionStore) -> Result<()> {
    SessionGuard::require(store)?;

    println!("{}", "GEMS Pré-Construídos".bold());
    for gem in builtin_gems() {
        let badge = if gem.pro {
            " [Pro]".yellow().to_string()
        } else {
            String::new()
        };
        println!(
            "  {} ({}){}",
            gem.name.bold(),
            gem.category.bright_black(),
            badge
        );
        println!("    {}", gem.description);
    }
    Ok(())
}

async fn demo(
    config: &BackendConfig,
    store: &SessionStore,
    storage: &SessionStorage,
) -> Result<()> {
    let demo_client = DemoAccessClient::from_config(config)?;
    let credentials = demo_client.create_demo_account().await?;

    println!("{}", "Conta demo criada:".bright_green());
    println!("  email: {}", credentials.email);
    println!("  senha: {}", credentials.password);

    let auth = AuthClient::new(config.clone())?;
    let session = auth
        .sign_in(store, &credentials.email, &credentials.password)
        .await?;
    storage.save(&session)?;
    println!("{}", "Bem-vindo ao modo demo!".bright_green());
    Ok(())
}
