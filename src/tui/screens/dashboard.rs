//! Dashboard screen: headline metrics and the document overview

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row},
    Frame,
};

use crate::api::{DocumentsApi, EmployeesApi};
use crate::metrics::DashboardStats;
use crate::models::{Document, Employee};
use crate::sync::{ResourceMirror, StatusMessage, SyncEvent, SyncOutcome};
use crate::tui::{
    components::{ResourceTable, TableConfig},
    context::AppContext,
    events::AppEvent,
    operations::TaskRunner,
    traits::{Navigable, ScreenAction, View},
    ui::{truncate, Theme},
};

pub struct DashboardScreen {
    pub documents: ResourceMirror<Document>,
    pub employees: ResourceMirror<Employee>,
    pub table: ResourceTable,
    runner: TaskRunner,
    documents_api: DocumentsApi,
    employees_api: EmployeesApi,
}

impl DashboardScreen {
    pub fn new(runner: TaskRunner, documents_api: DocumentsApi, employees_api: EmployeesApi) -> Self {
        let config = TableConfig::new(
            "Top Documents",
            vec!["#", "Docs", "Size", "Status"],
            vec![
                Constraint::Length(4),
                Constraint::Percentage(60),
                Constraint::Length(12),
                Constraint::Length(14),
            ],
        );
        Self {
            documents: ResourceMirror::new(),
            employees: ResourceMirror::new(),
            table: ResourceTable::new(config),
            runner,
            documents_api,
            employees_api,
        }
    }

    /// Fetch both collections unless a fetch is already running
    pub fn reload(&mut self) {
        if self.documents.begin_load() {
            self.runner.load(self.documents_api.clone(), AppEvent::DashboardDocuments);
        }
        if self.employees.begin_load() {
            self.runner.load(self.employees_api.clone(), AppEvent::DashboardEmployees);
        }
    }

    pub fn apply_documents(&mut self, event: SyncEvent<Document>) -> Option<StatusMessage> {
        let outcome = self.documents.apply(event);
        self.table.sync_len(self.documents.filtered_len());
        load_failure(outcome)
    }

    pub fn apply_employees(&mut self, event: SyncEvent<Employee>) -> Option<StatusMessage> {
        load_failure(self.employees.apply(event))
    }

    pub fn stats(&self) -> DashboardStats {
        DashboardStats::from_records(self.documents.items(), self.employees.items())
    }

    fn draw_cards(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let stats = self.stats();
        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(area);

        let count = |loading: bool, error: Option<&str>, value: usize| -> String {
            if loading {
                "…".to_string()
            } else if error.is_some() {
                "-".to_string()
            } else {
                value.to_string()
            }
        };

        let doc_loading = self.documents.is_loading();
        let doc_error = self.documents.error();
        let emp_loading = self.employees.is_loading();
        let emp_error = self.employees.error();

        let status_breakdown = if stats.employees_by_status.is_empty() {
            "-".to_string()
        } else {
            stats
                .employees_by_status
                .iter()
                .map(|(status, n)| format!("{} {}", n, status))
                .collect::<Vec<_>>()
                .join(", ")
        };

        let entries = [
            ("Total Documents", count(doc_loading, doc_error, stats.total_documents), String::new()),
            (
                "Active Documents",
                count(doc_loading, doc_error, stats.active_documents),
                format!("{}% of all", stats.active_percentage()),
            ),
            ("Total Employees", count(emp_loading, emp_error, stats.total_employees), String::new()),
            ("Employees by Status", String::new(), status_breakdown),
        ];

        for ((title, value, detail), area) in entries.into_iter().zip(cards.iter()) {
            let lines = vec![
                Line::from(Span::styled(value, theme.title())),
                Line::from(Span::styled(detail, theme.info())),
            ];
            let card = Paragraph::new(lines).block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(theme.inactive_border()),
            );
            f.render_widget(card, *area);
        }
    }

    fn draw_documents(&mut self, f: &mut Frame, area: Rect, theme: &Theme) {
        if self.documents.is_loading() || self.documents.error().is_some() {
            let (text, style) = match self.documents.error() {
                Some(error) => (error, theme.error()),
                None => ("Loading...", theme.inactive()),
            };
            self.table.render_message(f, area, text, style, theme);
            return;
        }

        let docs_width = (area.width as usize * 60 / 100).saturating_sub(2);
        let rows: Vec<Row<'static>> = self
            .documents
            .filtered()
            .enumerate()
            .map(|(i, doc)| {
                let docs = if doc.description.is_empty() {
                    doc.name.clone()
                } else {
                    format!("{} - {}", doc.name, doc.description)
                };
                Row::new(vec![
                    Cell::from((i + 1).to_string()),
                    Cell::from(truncate(&docs, docs_width)),
                    Cell::from(doc.size_display().to_string()),
                    Cell::from(doc.status_display().to_string()),
                ])
            })
            .collect();

        self.table.render(f, area, rows, theme, true);
    }
}

fn load_failure(outcome: SyncOutcome) -> Option<StatusMessage> {
    match outcome {
        SyncOutcome::Failed { message, .. } => Some(StatusMessage::error(message)),
        _ => None,
    }
}

impl View for DashboardScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect, ctx: &AppContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);

        self.draw_cards(f, chunks[0], &ctx.theme);
        self.draw_documents(f, chunks[1], &ctx.theme);
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &mut AppContext) -> ScreenAction {
        match key.code {
            KeyCode::Up => self.table.navigate_up(),
            KeyCode::Down => self.table.navigate_down(),
            KeyCode::Home => self.table.navigate_to_first(),
            KeyCode::End => self.table.navigate_to_last(),
            KeyCode::Char('r') => {
                self.reload();
                return ScreenAction::Notify(StatusMessage::loading("Refreshing dashboard..."));
            }
            _ => {}
        }
        ScreenAction::None
    }

    fn on_enter(&mut self, _ctx: &AppContext) {
        self.reload();
    }

    fn help_text(&self) -> &'static str {
        "Dashboard:\n\
        ↑/↓ - Scroll documents\n\
        Home/End - First / last document\n\
        r - Refresh metrics"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::config::Config;
    use crate::models::{AccessLevel, EmployeeStatus};
    use tokio::sync::mpsc;

    fn screen() -> (DashboardScreen, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = ApiClient::new(&Config::default().with_api_url(Some("http://127.0.0.1:1".to_string()))).unwrap();
        let screen = DashboardScreen::new(
            TaskRunner::new(tx),
            DocumentsApi::new(client.clone()),
            EmployeesApi::new(client),
        );
        (screen, rx)
    }

    #[tokio::test]
    async fn test_reload_is_not_issued_twice() {
        let (mut screen, mut rx) = screen();
        screen.reload();
        screen.reload();
        assert!(screen.documents.is_loading());
        assert!(screen.employees.is_loading());

        let mut delivered = 0;
        while delivered < 2 {
            match rx.recv().await {
                Some(AppEvent::DashboardDocuments(event)) => {
                    assert!(screen.apply_documents(event).unwrap().is_error());
                }
                Some(AppEvent::DashboardEmployees(event)) => {
                    assert!(screen.apply_employees(event).unwrap().is_error());
                }
                other => panic!("unexpected event {:?}", other),
            }
            delivered += 1;
        }
        assert!(rx.try_recv().is_err());
        assert_eq!(screen.documents.error(), Some("Failed to fetch documents"));
        assert_eq!(screen.employees.error(), Some("Failed to fetch employees"));
    }

    #[tokio::test]
    async fn test_stats_follow_loaded_collections() {
        let (mut screen, _rx) = screen();
        screen.documents.begin_load();
        screen.apply_documents(SyncEvent::Loaded(Ok(vec![Document {
            id: 1,
            name: "Handbook".to_string(),
            description: String::new(),
            size: None,
            status: "Active".to_string(),
            file_url: None,
        }])));
        screen.employees.begin_load();
        screen.apply_employees(SyncEvent::Loaded(Ok(vec![Employee {
            id: 1,
            name: "Alice".to_string(),
            email: "alice@corp.io".to_string(),
            status: EmployeeStatus::Approved,
            access: AccessLevel::Edit,
        }])));

        let stats = screen.stats();
        assert_eq!(stats.total_documents, 1);
        assert_eq!(stats.active_documents, 1);
        assert_eq!(stats.total_employees, 1);
        assert_eq!(screen.table.selected(), Some(0));
    }
}
