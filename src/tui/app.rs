//! Main TUI application state and logic

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info};

use super::components::StatusDisplay;
use super::context::AppContext;
use super::events::AppEvent;
use super::operations::TaskRunner;
use super::screens::*;
use super::traits::{ScreenAction, View};
use super::ui::centered_rect;
use crate::api::{ApiClient, DocumentsApi, EmployeesApi};
use crate::config::Config;
use crate::sync::{StatusMessage, StatusType};

/// Application screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Dashboard,
    Documents,
    NewDocument,
    Employees,
    NewEmployee,
    Settings,
}

impl Screen {
    /// Screens reachable from the header tabs, in tab order
    pub const TABS: [Screen; 6] = [
        Screen::Dashboard,
        Screen::Documents,
        Screen::NewDocument,
        Screen::Employees,
        Screen::NewEmployee,
        Screen::Settings,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Login => "Sign In",
            Screen::Dashboard => "Dashboard",
            Screen::Documents => "Documents",
            Screen::NewDocument => "New Document",
            Screen::Employees => "Employees",
            Screen::NewEmployee => "New Employee",
            Screen::Settings => "Settings",
        }
    }

    fn tab_index(&self) -> Option<usize> {
        Self::TABS.iter().position(|s| s == self)
    }

    fn next_tab(&self, forward: bool) -> Screen {
        let count = Self::TABS.len();
        let next = match self.tab_index() {
            Some(i) if forward => (i + 1) % count,
            Some(i) => (i + count - 1) % count,
            None => 0,
        };
        Self::TABS[next]
    }
}

/// Every screen the shell hosts
pub struct Screens {
    pub login: LoginScreen,
    pub dashboard: DashboardScreen,
    pub documents: DocumentsScreen,
    pub new_document: NewDocumentScreen,
    pub employees: EmployeesScreen,
    pub new_employee: NewEmployeeScreen,
    pub settings: SettingsScreen,
}

impl Screens {
    fn view_mut(&mut self, screen: Screen) -> &mut dyn View {
        match screen {
            Screen::Login => &mut self.login,
            Screen::Dashboard => &mut self.dashboard,
            Screen::Documents => &mut self.documents,
            Screen::NewDocument => &mut self.new_document,
            Screen::Employees => &mut self.employees,
            Screen::NewEmployee => &mut self.new_employee,
            Screen::Settings => &mut self.settings,
        }
    }
}

/// Main TUI application state
pub struct App {
    /// Current active screen
    pub current_screen: Screen,
    pub screens: Screens,
    pub context: AppContext,
    pub status: StatusDisplay,

    pub should_quit: bool,
    pub show_help_popup: bool,

    events: UnboundedReceiver<AppEvent>,
}

impl App {
    /// Create a new TUI application
    pub fn new(config: &Config) -> Result<Self> {
        let client = ApiClient::new(config)?;
        let documents_api = DocumentsApi::new(client.clone());
        let employees_api = EmployeesApi::new(client);
        let (tx, events) = mpsc::unbounded_channel();
        let runner = TaskRunner::new(tx);

        let screens = Screens {
            login: LoginScreen::new(),
            dashboard: DashboardScreen::new(runner.clone(), documents_api.clone(), employees_api.clone()),
            documents: DocumentsScreen::new(runner.clone(), documents_api.clone()),
            new_document: NewDocumentScreen::new(runner.clone(), documents_api),
            employees: EmployeesScreen::new(runner.clone(), employees_api.clone()),
            new_employee: NewEmployeeScreen::new(runner, employees_api),
            settings: SettingsScreen::new(),
        };

        info!("TUI started against {}", config.api_base());
        Ok(Self {
            current_screen: Screen::Login,
            screens,
            context: AppContext::new(&config.ui),
            status: StatusDisplay::new().with_history(50).with_timestamps(),
            should_quit: false,
            show_help_popup: false,
            events,
        })
    }

    /// Run the main application loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;

            while let Ok(app_event) = self.events.try_recv() {
                self.handle_app_event(app_event);
            }

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Tear down the application context
    pub fn shutdown(self) {
        info!("TUI closing");
        self.context.teardown();
    }

    /// Route a completed remote call to the screen that issued it
    pub fn handle_app_event(&mut self, app_event: AppEvent) {
        debug!("App event: {:?}", app_event);
        let message = match app_event {
            AppEvent::Documents(e) => self.screens.documents.apply(e),
            AppEvent::Employees(e) => self.screens.employees.apply(e),
            AppEvent::DashboardDocuments(e) => self.screens.dashboard.apply_documents(e),
            AppEvent::DashboardEmployees(e) => self.screens.dashboard.apply_employees(e),
            AppEvent::DocumentUploaded(result) => self.screens.new_document.apply(result),
            AppEvent::EmployeeAdded(result) => self.screens.new_employee.apply(result),
        };
        if let Some(message) = message {
            self.notify(message);
        }
    }

    /// Handle keyboard input events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        let editing = self.screens.view_mut(self.current_screen).is_editing_text();

        // Global shortcuts
        match key.code {
            KeyCode::F(1) => {
                self.show_help_popup = !self.show_help_popup;
                return;
            }
            KeyCode::Char('?') if !editing => {
                self.show_help_popup = !self.show_help_popup;
                return;
            }
            KeyCode::Esc if self.show_help_popup => {
                self.show_help_popup = false;
                return;
            }
            _ => {}
        }
        if self.show_help_popup {
            return;
        }

        if !editing {
            match key.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char(c @ '1'..='6') if self.context.is_signed_in() => {
                    let index = c as usize - '1' as usize;
                    self.navigate_to_screen(Screen::TABS[index]);
                    return;
                }
                KeyCode::Tab if self.context.is_signed_in() => {
                    self.navigate_to_screen(self.current_screen.next_tab(true));
                    return;
                }
                KeyCode::BackTab if self.context.is_signed_in() => {
                    self.navigate_to_screen(self.current_screen.next_tab(false));
                    return;
                }
                _ => {}
            }
        }

        let action = self
            .screens
            .view_mut(self.current_screen)
            .handle_key(key, &mut self.context);
        self.perform(action);
    }

    fn perform(&mut self, action: ScreenAction) {
        match action {
            ScreenAction::NavigateTo(screen) => self.navigate_to_screen(screen),
            ScreenAction::Quit => self.should_quit = true,
            ScreenAction::Notify(message) => self.notify(message),
            ScreenAction::None => {}
        }
    }

    /// Switch screens; everything but sign-in requires a session
    pub fn navigate_to_screen(&mut self, screen: Screen) {
        if screen != Screen::Login && !self.context.is_signed_in() {
            return;
        }
        debug!("Navigating from {:?} to {:?}", self.current_screen, screen);
        self.current_screen = screen;
        self.screens.view_mut(screen).on_enter(&self.context);
    }

    /// Show a message in the status bar; success and info messages respect
    /// the notifications preference
    pub fn notify(&mut self, message: StatusMessage) {
        let optional = matches!(message.status_type, StatusType::Success | StatusType::Info);
        if optional && !self.context.notifications {
            debug!("Notification suppressed: {}", message.message);
            return;
        }
        self.status.set_message(message);
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();
        f.render_widget(Block::default().style(self.context.theme.base()), size);

        let signed_in = self.context.is_signed_in();
        let header = if signed_in { 3 } else { 0 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(header),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        if signed_in {
            self.draw_tabs(f, chunks[0]);
        }

        self.screens
            .view_mut(self.current_screen)
            .draw(f, chunks[1], &self.context);

        self.draw_status_bar(f, chunks[2]);

        if self.show_help_popup {
            self.draw_help_popup(f, size);
        }
    }

    fn draw_tabs(&self, f: &mut Frame, area: Rect) {
        let theme = &self.context.theme;
        let titles: Vec<Line> = Screen::TABS
            .iter()
            .enumerate()
            .map(|(i, s)| Line::from(format!("{} {}", i + 1, s.title())))
            .collect();
        let user = self
            .context
            .session()
            .map(|s| s.email.clone())
            .unwrap_or_default();

        let tabs = Tabs::new(titles)
            .select(self.current_screen.tab_index().unwrap_or(0))
            .style(theme.text())
            .highlight_style(theme.selected())
            .block(
                Block::default()
                    .title(format!("deskboard | {}", user))
                    .borders(Borders::ALL)
                    .border_style(theme.inactive_border()),
            );
        f.render_widget(tabs, area);
    }

    /// Draw status bar with current screen info and shortcuts
    fn draw_status_bar(&self, f: &mut Frame, area: Rect) {
        let idle = if self.context.is_signed_in() {
            format!(
                "deskboard - {} | 1-6/Tab: Switch | q: Quit | F1/?: Help",
                self.current_screen.title()
            )
        } else {
            "deskboard - Sign In | Ctrl+C: Quit | F1: Help".to_string()
        };
        self.status.render(f, area, &self.context.theme, &idle);
    }

    /// Draw help popup with context-sensitive shortcuts
    fn draw_help_popup(&mut self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(80, 70, area);
        f.render_widget(Clear, popup_area);

        let theme = self.context.theme;
        let help_popup = Paragraph::new(self.context_help())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("Help - Context Shortcuts")
                    .borders(Borders::ALL)
                    .border_style(theme.warning()),
            )
            .style(theme.base());

        f.render_widget(help_popup, popup_area);
    }

    fn context_help(&mut self) -> String {
        let global_help = "Global Shortcuts:\n\
            1-6 / Tab / Shift+Tab - Switch tabs (outside text fields)\n\
            q - Quit (outside text fields)\n\
            Ctrl+C - Quit\n\
            F1 / ? - Toggle this help\n\n";
        let screen_help = self.screens.view_mut(self.current_screen).help_text();
        format!("{}{}", global_help, screen_help)
    }
}
