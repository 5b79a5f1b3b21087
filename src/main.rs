use std::sync::Arc;

use eyre::Result;
use pychat::app::services::{ActionService, ClipboardService, EventService, WavFileVoice};
use pychat::app::{App, AppState};
use pychat::backend::{ArcBackend, ArcCredentials, EnvCredentials, Gemini};
use pychat::config::{Configuration, init_logger, verbose};
use pychat::models::{Action, SessionConfiguration};
use pychat::{app::destruct_terminal_for_panic, cli::Command};
use tokio::{sync::mpsc, task};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Command::new();
    if cmd.version() {
        cmd.print_version();
        return Ok(());
    }

    std::panic::set_hook(Box::new(|panic_info| {
        destruct_terminal_for_panic();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let config = cmd.get_config()?;
    Configuration::init(config)?;
    let config = Configuration::instance();

    init_logger(&config.log)?;
    verbose!("[+] Logger initialized");

    let credentials: ArcCredentials = Arc::new(EnvCredentials::from(&config.backend));
    if !credentials.has_credential() {
        verbose!(
            "[!] No API key found, set {} or backend.api_key_file",
            config.backend.api_key_env
        );
    }

    let backend: ArcBackend = Arc::new(Gemini::from_config(config, Arc::clone(&credentials)));
    verbose!("[+] Backend {} initialized", backend.name());

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let mut events = EventService::default();
    let token = CancellationToken::new();
    let mut task_set = task::JoinSet::new();

    let voice = Arc::new(WavFileVoice::new(&config.speech.output_dir));
    let action_backend = Arc::clone(&backend);
    let event_tx = Arc::new(events.event_tx());
    let action_token = token.clone();
    task_set.spawn(async move {
        ActionService::new(
            event_tx,
            &mut action_rx,
            action_backend,
            credentials,
            voice,
            action_token,
        )
        .start()
        .await
    });

    let clipboard_token = token.clone();
    task_set.spawn(async move { ClipboardService::start(clipboard_token).await });

    let session = SessionConfiguration::new(config.chat.deep_reasoning, config.chat.search_grounding);
    let mut app_state =
        AppState::new(backend, session).with_max_speech_chars(config.speech.max_chars);
    if let Some(greeting) = &config.general.hello_message {
        app_state = app_state.with_greeting(greeting);
    }

    let mut app = App::new(app_state, action_tx, &mut events, token.clone());
    if let Err(err) = app.run().await {
        eprintln!("Error: {}", err);
    }

    token.cancel();
    while let Some(res) = task_set.join_next().await {
        match res {
            Ok(Err(err)) => log::error!("Service error: {}", err),
            Ok(Ok(())) => {}
            Err(err) => log::error!("Task error: {}", err),
        }
    }

    Ok(())
}
