//! TicketDesk Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;
use chrono::Utc;
use teloxide::{prelude::*, types::{CallbackQuery, Update}};
use teloxide::dispatching::UpdateHandler;
use teloxide::utils::command::BotCommands;
use tracing::{debug, info, warn};

use TicketDesk::{
    config::Settings,
    database::{create_pool, run_migrations, DatabaseService, PoolConfig},
    handlers::{Command, Workflow},
    messenger::{EventKind, InboundEvent, Sender, TelegramMessenger},
    utils::logging,
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard flushes the file writer on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", TicketDesk::info());

    // Initialize database connection
    info!("Connecting to database...");
    let pool = create_pool(&PoolConfig::from(&settings.database)).await?;
    run_migrations(&pool).await?;

    let repository = Arc::new(DatabaseService::new(pool, &settings.tickets.default_user_group));
    match repository.get_system_stats().await {
        Ok(stats) => info!(stats = %stats, "Ticket store ready"),
        Err(e) => warn!(error = %e, "Failed to read ticket store statistics"),
    }

    // Initialize bot
    let bot = Bot::new(&settings.bot.token);
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %e, "Failed to register bot commands");
    }

    let messenger = Arc::new(TelegramMessenger::new(bot.clone()));
    let workflow = Arc::new(Workflow::new(repository, messenger, settings.tickets.clone()));

    let mut dispatcher = Dispatcher::builder(bot, create_handler())
        .dependencies(dptree::deps![workflow])
        .default_handler(|upd| async move {
            debug!("Unhandled update: {:?}", upd.kind);
        })
        .enable_ctrlc_handler()
        .build();

    if let Some(webhook_url) = &settings.bot.webhook_url {
        info!("Webhook URL configured: {}", webhook_url);
        info!("Note: webhook mode is not supported, falling back to polling");
    }

    info!("Starting bot with polling mode...");
    dispatcher.dispatch().await;

    info!("TicketDesk bot has been shut down.");
    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    dptree::entry()
        .branch(Update::filter_message().endpoint(handle_message))
        .branch(Update::filter_callback_query().endpoint(handle_callback))
}

/// Split `/name@bot args` into `name`
fn command_name(text: &str) -> Option<&str> {
    let word = text.strip_prefix('/')?.split_whitespace().next()?;
    let name = word.split('@').next().unwrap_or(word);
    (!name.is_empty()).then_some(name)
}

fn sender_of(user: &teloxide::types::User) -> Sender {
    Sender {
        identity: user.id.0 as i64,
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        username: user.username.clone(),
    }
}

async fn run(workflow: &Workflow, event: InboundEvent) {
    // Failures are logged and answered inside the workflow
    if let Err(e) = workflow.handle_event(event).await {
        debug!(error = %e, "Update finished with an error");
    }
}

/// Handle text messages and commands
async fn handle_message(msg: Message, workflow: Arc<Workflow>) -> HandlerResult {
    let (Some(user), Some(text)) = (msg.from.as_ref(), msg.text()) else {
        return Ok(());
    };

    let kind = match command_name(text) {
        Some(name) => EventKind::Command(name.to_lowercase()),
        None => EventKind::FreeText(text.to_string()),
    };

    let event = InboundEvent {
        chat_id: msg.chat.id.0,
        sender: sender_of(user),
        received_at: msg.date,
        kind,
    };
    run(&workflow, event).await;
    Ok(())
}

/// Handle callback queries
async fn handle_callback(query: CallbackQuery, workflow: Arc<Workflow>) -> HandlerResult {
    let sender = sender_of(&query.from);
    let chat_id = query
        .message
        .as_ref()
        .map(|m| m.chat().id.0)
        .unwrap_or(sender.identity);

    let event = InboundEvent {
        chat_id,
        sender,
        received_at: Utc::now(),
        kind: EventKind::Action {
            token: query.data.clone().unwrap_or_default(),
            source_message_id: query.message.as_ref().map(|m| m.id().0),
            callback_id: query.id.to_string(),
        },
    };
    run(&workflow, event).await;
    Ok(())
}
