// src/tui/mod.rs
use crate::core::refresher::DashboardRefresher;
use crate::core::render::{DashboardState, ProfitClass, RowAction};
use crate::types::UiEvent;
use chrono::{DateTime, Local};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Terminal,
};
use std::collections::VecDeque;
use std::{io, time::Duration};
use tokio::sync::mpsc;
use tracing::info;

/// What a key press asks the outside world to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Refresh,
    StartTrading(String),
    ManagePositions(String),
}

pub struct App {
    pub backend: String,
    pub state: Option<DashboardState>,
    pub loading: bool,
    pub selected: usize,
    pub alerts: VecDeque<String>,
    pub notice: Option<String>,
    pub last_updated: Option<DateTime<Local>>,
}

impl App {
    pub fn new(backend: String) -> Self {
        Self {
            backend,
            state: None,
            loading: false,
            selected: 0,
            alerts: VecDeque::new(),
            notice: None,
            last_updated: None,
        }
    }

    fn row_count(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.rows.len())
    }

    pub fn on_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Loading(visible) => {
                self.loading = visible;
            }
            UiEvent::Render(state) => {
                self.state = Some(state);
                self.notice = None;
                self.selected = self.selected.min(self.row_count().saturating_sub(1));
                self.last_updated = Some(Local::now());
            }
            UiEvent::Alert(message) => {
                self.alerts.push_back(message);
            }
        }
    }

    /// An open alert swallows every key except the ones that dismiss it.
    pub fn on_key(&mut self, code: KeyCode) -> Option<Command> {
        if !self.alerts.is_empty() {
            if matches!(code, KeyCode::Enter | KeyCode::Esc) {
                self.alerts.pop_front();
            }
            return None;
        }

        match code {
            KeyCode::Char('q') => Some(Command::Quit),
            KeyCode::Char('r') => Some(Command::Refresh),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.row_count() {
                    self.selected += 1;
                }
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Enter | KeyCode::Char('s') => self.activate_selected(),
            _ => None,
        }
    }

    fn activate_selected(&self) -> Option<Command> {
        let row = self.state.as_ref()?.rows.get(self.selected)?;
        match &row.action {
            RowAction::Waiting => None,
            RowAction::ManagePositions { currency } => {
                Some(Command::ManagePositions(currency.clone()))
            }
            RowAction::StartTrading { currency } => Some(Command::StartTrading(currency.clone())),
        }
    }
}

pub async fn run(
    mut rx: mpsc::Receiver<UiEvent>,
    refresher: DashboardRefresher,
    backend: String,
) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend_ui = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_ui)?;

    let mut app = App::new(backend);
    let result = event_loop(&mut terminal, &mut app, &mut rx, &refresher);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: &mut mpsc::Receiver<UiEvent>,
    refresher: &DashboardRefresher,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match app.on_key(key.code) {
                        Some(Command::Quit) => break,
                        Some(Command::Refresh) => {
                            info!("Manual refresh requested");
                            tokio::spawn(refresher.refresh());
                        }
                        Some(Command::StartTrading(currency)) => {
                            app.notice = Some(format!("{} 開始交易請求已送出", currency));
                            tokio::spawn(refresher.start_trading(&currency));
                        }
                        Some(Command::ManagePositions(currency)) => {
                            let url = refresher.api().manage_positions_url(&currency);
                            app.notice = Some(format!("管理持倉: {}", url));
                        }
                        None => {}
                    }
                }
            }
        }

        while let Ok(event) = rx.try_recv() {
            app.on_event(event);
        }
    }

    Ok(())
}

fn ui(f: &mut ratatui::Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_header(f, app, chunks[0]);
    render_cards(f, app, chunks[1]);
    render_table(f, app, chunks[2]);
    render_footer(f, app, chunks[3]);

    if let Some(message) = app.alerts.front() {
        render_alert(f, message);
    }
}

fn render_header(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let updated = match app.last_updated {
        Some(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "Waiting for data...".to_string(),
    };

    let mut spans = vec![
        Span::styled("Trade Dashboard", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(" [{}]", app.backend)),
        Span::raw(" | Updated: "),
        Span::styled(updated, Style::default().fg(Color::Yellow)),
    ];
    if app.loading {
        spans.push(Span::styled(
            "  ⟳ Loading...",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let header =
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(header, area);
}

fn render_cards(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 6); 6])
        .split(area);

    let cards = app.state.as_ref().map(|s| s.summary.as_slice()).unwrap_or(&[]);
    for (i, slot) in slots.iter().enumerate() {
        let (title, value) = match cards.get(i) {
            Some(card) => (card.label, card.value.as_str()),
            None => ("", "-"),
        };
        let card = Paragraph::new(Span::styled(
            value,
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(card, *slot);
    }
}

fn render_table(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let rows: Vec<Row> = app
        .state
        .as_ref()
        .map(|s| s.rows.as_slice())
        .unwrap_or(&[])
        .iter()
        .map(|r| {
            let profit_color = match r.profit_class {
                ProfitClass::Profit => Color::Green,
                ProfitClass::Loss => Color::Red,
            };
            let action_style = match r.action {
                RowAction::Waiting => Style::default().fg(Color::Yellow),
                RowAction::ManagePositions { .. } => Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::UNDERLINED),
                RowAction::StartTrading { .. } => Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green),
            };
            Row::new(vec![
                Cell::from(r.pair.clone()),
                Cell::from(r.price.clone()),
                Cell::from(r.amount.clone()),
                Cell::from(r.profit.clone()).style(Style::default().fg(profit_color)),
                Cell::from(r.action.label()).style(action_style),
            ])
        })
        .collect();

    let header = Row::new(vec!["幣種", "當前價格", "持倉數量", "總收益", "操作"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(18),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(17),
            Constraint::Percentage(25),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title("Currencies"))
    .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .highlight_symbol("> ");

    let mut state = TableState::default();
    if app.row_count() > 0 {
        state.select(Some(app.selected));
    }
    f.render_stateful_widget(table, area, &mut state);
}

fn render_footer(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let text = match &app.notice {
        Some(notice) => notice.clone(),
        None => "q quit | r refresh | ↑/↓ select | Enter/s act on row".to_string(),
    };
    let footer = Paragraph::new(text).block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}

fn render_alert(f: &mut ratatui::Frame, message: &str) {
    let area = centered_rect(60, 30, f.size());
    let popup = Paragraph::new(vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "[Enter] OK",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ])
    .wrap(Wrap { trim: true })
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("Notice"));

    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
