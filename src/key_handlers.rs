use crate::app::{refresh_dashboard, run_retry, run_send, App, AppScreen, LoginField};
use crate::formatters::validate_message;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::Mutex;

pub fn handle_login_input(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Tab => {
            app.login_field = match app.login_field {
                LoginField::Email => LoginField::Password,
                LoginField::Password => LoginField::Email,
            };
        }
        KeyCode::Enter => {
            if app.login_email.trim().is_empty() {
                return;
            }
            let email = app.login_email.clone();
            match app.auth.login(&email) {
                Ok(user) => {
                    app.logs.add(format!("Signed in as {}", user.email));
                    app.login_password.clear();
                    app.screen = AppScreen::Chat;
                }
                Err(e) => {
                    app.logs.add(format!("Login failed: {}", e));
                }
            }
        }
        KeyCode::Backspace => {
            match app.login_field {
                LoginField::Email => app.login_email.pop(),
                LoginField::Password => app.login_password.pop(),
            };
        }
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            if c == 'q' || c == 'c' {
                app.screen = AppScreen::Quit;
            }
        }
        KeyCode::Char(c) => match app.login_field {
            LoginField::Email => app.login_email.push(c),
            LoginField::Password => app.login_password.push(c),
        },
        _ => {}
    }
}

pub async fn handle_chat_input(key: KeyEvent, app: &mut App, app_arc: Arc<Mutex<App>>) {
    match key.code {
        KeyCode::Enter => {
            match validate_message(&app.chat_input, app.config.max_message_len) {
                Ok(text) => {
                    app.chat_input.clear();
                    app.input_error = None;
                    // Auto-follow new messages.
                    app.chat_scroll = u16::MAX;
                    tokio::spawn(run_send(app_arc, text));
                }
                Err(e) => {
                    // Blank input is silently ignored, like the source UI.
                    if !app.chat_input.trim().is_empty() {
                        app.input_error = Some(e);
                    }
                }
            }
        }
        KeyCode::PageUp => app.scroll_chat_up(),
        KeyCode::PageDown => app.scroll_chat_down(),
        KeyCode::Up => app.logs_scroll = app.logs_scroll.saturating_sub(1),
        KeyCode::Down => app.logs_scroll = app.logs_scroll.saturating_add(1),
        KeyCode::Backspace => {
            app.chat_input.pop();
            app.input_error = None;
        }
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => match c {
            'c' | 'q' => app.screen = AppScreen::QuitConfirm,
            'n' => {
                // Safe mid-send: the epoch bump orphans the in-flight turn.
                app.session.start_new_chat().await;
                app.logs.add("Started a new chat");
            }
            'r' => {
                tokio::spawn(run_retry(app_arc));
            }
            'e' => app.session.clear_error(),
            'd' => {
                if app.auth.is_admin() {
                    app.screen = AppScreen::Dashboard;
                    tokio::spawn(refresh_dashboard(app_arc));
                } else {
                    app.logs.add("Dashboard requires an admin login");
                }
            }
            'l' => {
                // The conversation must not survive the account, even with a
                // send in flight.
                app.auth.logout();
                app.session.start_new_chat().await;
                app.screen = AppScreen::Login;
            }
            'u' => app.scroll_chat_up(),
            'j' => app.scroll_chat_down(),
            _ => {}
        },
        KeyCode::Char(c) => {
            app.chat_input.push(c);
            app.input_error = None;
        }
        _ => {}
    }
}

pub fn handle_dashboard_input(key: KeyEvent, app: &mut App, app_arc: Arc<Mutex<App>>) {
    match key.code {
        KeyCode::Esc => app.screen = AppScreen::Chat,
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            if c == 'q' || c == 'c' {
                app.screen = AppScreen::QuitConfirm;
            }
        }
        KeyCode::Char('r') => {
            tokio::spawn(refresh_dashboard(app_arc));
        }
        _ => {}
    }
}

pub fn handle_quit_confirm_input(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
            app.screen = AppScreen::Quit;
        }
        KeyCode::Char('n') | KeyCode::Esc => {
            app.screen = AppScreen::Chat;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ChatApi;
    use crate::app::DashboardState;
    use crate::auth::AuthStore;
    use crate::config::Config;
    use crate::log_view::LogView;
    use crate::session::ChatSession;
    use crate::status_indicator::StatusIndicator;
    use tempfile::TempDir;

    fn test_app() -> (App, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        let app = App {
            screen: AppScreen::Chat,
            auth: AuthStore::open(dir.path().to_path_buf()),
            session: ChatSession::new(ChatApi::new(&config)),
            config,
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
        };
        (app, dir)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[tokio::test]
    async fn test_logout_clears_conversation_even_mid_send() {
        let (mut app, _dir) = test_app();
        app.auth.login("user@example.com").unwrap();

        // A send is still in flight when the user hits Ctrl+L.
        let _pending = app.session.begin_send("is the X1 in stock?").unwrap();
        assert!(app.session.is_loading);

        let app_arc = Arc::new(Mutex::new(test_app().0));
        handle_chat_input(ctrl('l'), &mut app, app_arc).await;

        assert_eq!(app.screen, AppScreen::Login);
        assert!(!app.auth.is_authenticated());
        // Nothing of the old conversation survives the logout.
        assert_eq!(app.session.messages.len(), 1);
        assert!(app.session.messages[0].is_welcome);
        assert_eq!(app.session.session_id(), None);
        assert!(!app.session.is_loading);
    }

    #[tokio::test]
    async fn test_new_chat_resets_mid_send_too() {
        let (mut app, _dir) = test_app();
        let _pending = app.session.begin_send("hello").unwrap();

        let app_arc = Arc::new(Mutex::new(test_app().0));
        handle_chat_input(ctrl('n'), &mut app, app_arc).await;

        assert_eq!(app.session.messages.len(), 1);
        assert!(app.session.messages[0].is_welcome);
        assert!(!app.session.is_loading);
    }

    #[tokio::test]
    async fn test_up_and_down_scroll_the_log_pane() {
        let (mut app, _dir) = test_app();
        app.logs_scroll = 3;

        let arc = Arc::new(Mutex::new(test_app().0));
        let up = KeyEvent::new(KeyCode::Up, KeyModifiers::NONE);
        let down = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);

        handle_chat_input(up, &mut app, Arc::clone(&arc)).await;
        assert_eq!(app.logs_scroll, 2);
        handle_chat_input(down, &mut app, arc).await;
        assert_eq!(app.logs_scroll, 3);
    }
}
