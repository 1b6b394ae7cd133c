use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, backend::CrosstermBackend, Terminal};
use std::{io, sync::Arc, time::Duration};
use stockchat::{
    app::health_poll_task,
    config::Config,
    key_handlers::{
        handle_chat_input, handle_dashboard_input, handle_login_input, handle_quit_confirm_input,
    },
    logging::init_logging,
    ui, App, AppScreen,
};
use tokio::sync::Mutex;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let config = Config::load()?;
    let _logger = init_logging(&config.log_level)?;
    log::info!("stockchat starting against {}", config.api_base_url);

    let app = Arc::new(Mutex::new(App::new(config)?));
    tokio::spawn(health_poll_task(Arc::clone(&app)));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, app).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: Arc<Mutex<App>>) -> Result<()> {
    loop {
        {
            let mut guard = app.lock().await;
            if guard.screen == AppScreen::Quit {
                return Ok(());
            }
            terminal.draw(|f| ui(f, &mut guard))?;
        }

        // Short poll keeps the spinner and background task results flowing
        // even when no keys arrive.
        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let mut guard = app.lock().await;
            match guard.screen {
                AppScreen::Login => handle_login_input(key, &mut guard),
                AppScreen::Chat => {
                    handle_chat_input(key, &mut guard, Arc::clone(&app)).await;
                }
                AppScreen::Dashboard => {
                    handle_dashboard_input(key, &mut guard, Arc::clone(&app));
                }
                AppScreen::QuitConfirm => handle_quit_confirm_input(key, &mut guard),
                AppScreen::Quit => return Ok(()),
            }
        }
    }
}
