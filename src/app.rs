use crate::api::ChatApi;
use crate::auth::AuthStore;
use crate::config::{config_dir, Config};
use crate::errors::StockchatResult;
use crate::log_view::LogView;
use crate::metrics::{derive_metrics, InventoryMetrics};
use crate::session::ChatSession;
use crate::status_indicator::StatusIndicator;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Login,
    Chat,
    Dashboard,
    QuitConfirm,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

/// Dashboard data goes through an explicit page-level lifecycle; a failed
/// fetch is shown with a manual retry, never retried automatically.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardState {
    Loading,
    Loaded(InventoryMetrics),
    Failed(String),
}

pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub auth: AuthStore,
    pub session: ChatSession,
    pub status_indicator: StatusIndicator,
    pub logs: LogView,

    pub chat_input: String,
    pub input_error: Option<String>,
    pub chat_scroll: u16,
    pub logs_scroll: u16,

    pub login_email: String,
    pub login_password: String,
    pub login_field: LoginField,

    pub dashboard: DashboardState,
}

impl App {
    pub fn new(config: Config) -> StockchatResult<Self> {
        let auth = AuthStore::open(config_dir()?);
        let session = ChatSession::new(ChatApi::new(&config));

        let screen = if auth.is_authenticated() {
            AppScreen::Chat
        } else {
            AppScreen::Login
        };

        Ok(Self {
            screen,
            config,
            auth,
            session,
            status_indicator: StatusIndicator::new(),
            logs: LogView::new(),
            chat_input: String::new(),
            input_error: None,
            chat_scroll: 0,
            logs_scroll: 0,
            login_email: String::new(),
            login_password: String::new(),
            login_field: LoginField::Email,
            dashboard: DashboardState::Loading,
        })
    }

    pub fn scroll_chat_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    pub fn scroll_chat_down(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_add(1);
    }
}

/// One turn of the chat, run as a background task so the draw loop keeps the
/// spinner moving. The app lock is only held around the state transitions,
/// not across the request.
pub async fn run_send(app: Arc<Mutex<App>>, text: String) {
    let pending = {
        let mut guard = app.lock().await;
        let pending = guard.session.begin_send(&text);
        if pending.is_some() {
            guard.logs.add("Sending message to assistant...");
            guard.status_indicator.set_thinking(true);
        }
        pending
    };

    let Some(pending) = pending else { return };
    let epoch = pending.epoch();
    let result = pending.execute().await;

    let mut guard = app.lock().await;
    guard.status_indicator.set_thinking(false);
    // A reset (new chat, logout) mid-flight makes this completion stale.
    if epoch != guard.session.epoch() {
        guard.logs.add("Discarding reply from a reset conversation");
        return;
    }
    match &result {
        Ok(reply) => {
            guard.logs.add(format!(
                "Reply received ({} products)",
                reply.products.len()
            ));
        }
        Err(err) => {
            guard.logs.add(format!("Send failed: {}", err));
        }
    }
    guard.session.complete_send(result);
}

/// Retry of the last user message, same task shape as `run_send`.
pub async fn run_retry(app: Arc<Mutex<App>>) {
    let pending = {
        let mut guard = app.lock().await;
        let pending = guard.session.prepare_retry();
        if pending.is_some() {
            guard.logs.add("Retrying last message...");
            guard.status_indicator.set_thinking(true);
        }
        pending
    };

    let Some(pending) = pending else { return };
    let epoch = pending.epoch();
    let result = pending.execute().await;

    let mut guard = app.lock().await;
    guard.status_indicator.set_thinking(false);
    if epoch != guard.session.epoch() {
        return;
    }
    guard.session.complete_send(result);
}

/// Fetches the product list and derives the dashboard metrics. Runs over a
/// transport clone so an in-flight chat send never delays the fetch.
pub async fn refresh_dashboard(app: Arc<Mutex<App>>) {
    let transport = {
        let mut guard = app.lock().await;
        guard.dashboard = DashboardState::Loading;
        guard.session.transport().await
    };

    let result = transport.fetch_inventory().await;

    let mut guard = app.lock().await;
    guard.dashboard = match result {
        Ok(products) => {
            guard
                .logs
                .add(format!("Inventory loaded ({} products)", products.len()));
            DashboardState::Loaded(derive_metrics(&products))
        }
        Err(err) => {
            log::warn!("inventory fetch failed: {}", err);
            guard.logs.add(format!("Inventory fetch failed: {}", err));
            DashboardState::Failed("Failed to load inventory data".to_string())
        }
    };
}

/// 30-second health probe loop; runs for the lifetime of the app. The
/// session discards these results while a send is in flight.
pub async fn health_poll_task(app: Arc<Mutex<App>>) {
    let (transport, interval) = {
        let guard = app.lock().await;
        (
            guard.session.transport().await,
            guard.config.health_poll_interval(),
        )
    };

    loop {
        let healthy = transport.check_health().await;
        {
            let mut guard = app.lock().await;
            guard.session.apply_health(healthy);
            if guard.screen == AppScreen::Quit {
                return;
            }
        }
        tokio::time::sleep(interval).await;
    }
}
