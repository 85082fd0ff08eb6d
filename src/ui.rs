use anyhow::Result;
use combat_labs::access::{AccessControlSystem, Guarded, Principal, Resource, Role, User};
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

const PAGE_STEP: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Users,
    Resources,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Users => Page::Resources,
            Page::Resources => Page::Users,
        }
    }

    pub fn previous(&self) -> Self {
        // Two pages: previous and next coincide
        self.next()
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Users => "Users",
            Page::Resources => "Resources",
        }
    }
}

pub struct App {
    pub system: AccessControlSystem<User, Resource>,
    pub current_page: Page,
    pub users_state: TableState,
    pub resources_state: TableState,
    pub show_detail: bool,
    pub sorted: bool,
}

impl App {
    pub fn new(system: AccessControlSystem<User, Resource>) -> Self {
        let mut users_state = TableState::default();
        if !system.users().is_empty() {
            users_state.select(Some(0));
        }
        let mut resources_state = TableState::default();
        if !system.resources().is_empty() {
            resources_state.select(Some(0));
        }

        Self {
            system,
            current_page: Page::Users,
            users_state,
            resources_state,
            show_detail: false,
            sorted: false,
        }
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    pub fn sort_by_access_level(&mut self) {
        self.system.sort_users_by_access_level();
        self.sorted = true;
        if !self.system.users().is_empty() {
            self.users_state.select(Some(0));
        }
    }

    pub fn selected_user(&self) -> Option<&User> {
        self.users_state
            .selected()
            .and_then(|i| self.system.users().get(i))
            .map(|u| &**u)
    }

    pub fn selected_resource(&self) -> Option<&Resource> {
        self.resources_state
            .selected()
            .and_then(|i| self.system.resources().get(i))
            .map(|r| &**r)
    }

    /// Row count and table state of the visible page
    fn current_table(&mut self) -> (usize, &mut TableState) {
        match self.current_page {
            Page::Users => (self.system.users().len(), &mut self.users_state),
            Page::Resources => (self.system.resources().len(), &mut self.resources_state),
        }
    }

    pub fn next(&mut self) {
        let (len, state) = self.current_table();
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let (len, state) = self.current_table();
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let (len, state) = self.current_table();
        if len == 0 {
            return;
        }
        let i = state.selected().map(|i| (i + PAGE_STEP).min(len - 1)).unwrap_or(0);
        state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        let (len, state) = self.current_table();
        if len == 0 {
            return;
        }
        let i = state.selected().map(|i| i.saturating_sub(PAGE_STEP)).unwrap_or(0);
        state.select(Some(i));
    }

    pub fn first(&mut self) {
        let (len, state) = self.current_table();
        if len > 0 {
            state.select(Some(0));
        }
    }

    pub fn last(&mut self) {
        let (len, state) = self.current_table();
        if len > 0 {
            state.select(Some(len - 1));
        }
    }

    /// Resources the selected user may open, out of all resources
    pub fn access_count(&self, user: &User) -> (usize, usize) {
        let resources = self.system.resources();
        let allowed = resources.iter().filter(|r| r.check_access(user)).count();
        (allowed, resources.len())
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Enter => app.toggle_detail(),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.previous_page();
                    } else {
                        app.next_page();
                    }
                }
                KeyCode::BackTab => app.previous_page(),
                KeyCode::Char('s') => app.sort_by_access_level(),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                KeyCode::Home => app.first(),
                KeyCode::End => app.last(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    if app.show_detail {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);

        render_page(f, content_chunks[0], app);
        render_detail_panel(f, content_chunks[1], app);
    } else {
        render_page(f, chunks[1], app);
    }

    render_status_bar(f, chunks[2], app);
}

fn render_page(f: &mut Frame, area: Rect, app: &mut App) {
    match app.current_page {
        Page::Users => render_users(f, area, app),
        Page::Resources => render_resources(f, area, app),
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![];
    for (i, page) in [Page::Users, Page::Resources].iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title().to_string(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Users: {}", app.system.users().len()),
        Style::default().fg(Color::White),
    ));
    tab_spans.push(Span::raw("  "));
    tab_spans.push(Span::styled(
        format!("Resources: {}", app.system.resources().len()),
        Style::default().fg(Color::White),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn header_row(titles: &[&'static str]) -> Row<'static> {
    let cells = titles.iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });
    Row::new(cells).style(Style::default().bg(Color::DarkGray)).height(1)
}

fn role_color(role: &Role) -> Color {
    match role {
        Role::User => Color::White,
        Role::Student { .. } => Color::Green,
        Role::Teacher { .. } => Color::Cyan,
        Role::Administrator { .. } => Color::Red,
    }
}

fn role_detail(role: &Role) -> String {
    match role {
        Role::User => String::new(),
        Role::Student { group } => group.clone(),
        Role::Teacher { department } => department.clone(),
        Role::Administrator { admin_level } => format!("admin level {}", admin_level),
    }
}

fn render_users(f: &mut Frame, area: Rect, app: &mut App) {
    let rows: Vec<Row> = app
        .system
        .users()
        .iter()
        .map(|user| {
            let color = role_color(user.role());
            Row::new(vec![
                Cell::from(user.id().to_string()),
                Cell::from(truncate(user.name(), 28)),
                Cell::from(user.role().tag()).style(Style::default().fg(color)),
                Cell::from(user.access_level().to_string()),
                Cell::from(truncate(&role_detail(user.role()), 20)),
            ])
            .height(1)
        })
        .collect();

    let title = if app.sorted {
        " Users (by access level) "
    } else {
        " Users "
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(30),
            Constraint::Length(15),
            Constraint::Length(8),
            Constraint::Length(22),
        ],
    )
    .header(header_row(&["ID", "Name", "Role", "Level", "Group / Dept"]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.users_state);
}

fn render_resources(f: &mut Frame, area: Rect, app: &mut App) {
    let user_count = app.system.users().len();
    let rows: Vec<Row> = app
        .system
        .resources()
        .iter()
        .map(|resource| {
            let allowed = app
                .system
                .users()
                .iter()
                .filter(|u| resource.check_access(&***u))
                .count();
            Row::new(vec![
                Cell::from(truncate(resource.name(), 30)),
                Cell::from(resource.required_access_level().to_string()),
                Cell::from(format!("{}/{}", allowed, user_count)),
            ])
            .height(1)
        })
        .collect();

    let table = Table::new(
        rows,
        [Constraint::Length(32), Constraint::Length(10), Constraint::Length(12)],
    )
    .header(header_row(&["Resource", "Required", "Allowed"]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Resources "),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.resources_state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let (selected, total) = match app.current_page {
        Page::Users => (app.users_state.selected(), app.system.users().len()),
        Page::Resources => (app.resources_state.selected(), app.system.resources().len()),
    };
    let selected = selected.map(|i| i + 1).unwrap_or(0);

    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));
    let status_spans = vec![
        Span::styled(format!(" Row: {}/{} ", selected, total), Style::default().fg(Color::Cyan)),
        Span::raw(" | "),
        key("Enter"),
        Span::raw(" Details | "),
        key("Tab"),
        Span::raw(" Page | "),
        key("s"),
        Span::raw(" Sort | "),
        key("↑/↓"),
        Span::raw(" Nav | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_bar = Paragraph::new(vec![Line::from(status_spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::White)));

    f.render_widget(status_bar, area);
}

fn label(text: &'static str) -> Span<'static> {
    Span::styled(text, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let content = match app.current_page {
        Page::Users => match app.selected_user() {
            Some(user) => user_detail(app, user),
            None => vec![Line::from("No user selected")],
        },
        Page::Resources => match app.selected_resource() {
            Some(resource) => resource_detail(app, resource),
            None => vec![Line::from("No resource selected")],
        },
    };

    let title = match app.current_page {
        Page::Users => " User Details ",
        Page::Resources => " Resource Details ",
    };
    f.render_widget(Paragraph::new(content).block(block.title(title)), area);
}

fn user_detail(app: &App, user: &User) -> Vec<Line<'static>> {
    let (allowed, total) = app.access_count(user);
    let mut lines = vec![
        Line::from(""),
        Line::from(vec![label("  Name: "), Span::raw(user.name().to_string())]),
        Line::from(vec![label("  ID: "), Span::raw(user.id().to_string())]),
        Line::from(vec![
            label("  Role: "),
            Span::styled(user.role().tag(), Style::default().fg(role_color(user.role()))),
        ]),
        Line::from(vec![label("  Access Level: "), Span::raw(user.access_level().to_string())]),
    ];
    let detail = role_detail(user.role());
    if !detail.is_empty() {
        lines.push(Line::from(vec![label("  Detail: "), Span::raw(detail)]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![Span::styled(
        format!("  ACCESS ({}/{})", allowed, total),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    )]));
    lines.push(Line::from(""));

    for resource in app.system.resources() {
        let (mark, color) = if resource.check_access(user) {
            ("✓", Color::Green)
        } else {
            ("✗", Color::Red)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", mark), Style::default().fg(color)),
            Span::raw(resource.name().to_string()),
        ]));
    }
    lines
}

fn resource_detail(app: &App, resource: &Resource) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(""),
        Line::from(vec![label("  Resource: "), Span::raw(resource.name().to_string())]),
        Line::from(vec![
            label("  Required Level: "),
            Span::raw(resource.required_access_level().to_string()),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  ALLOWED USERS",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )]),
        Line::from(""),
    ];

    for user in app.system.users().iter().filter(|u| resource.check_access(&***u)) {
        lines.push(Line::from(format!("  {} (level {})", user.name(), user.access_level())));
    }
    lines
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_labs::access::university;

    fn app() -> App {
        App::new(university().unwrap())
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = app();
        assert_eq!(app.selected_user().unwrap().id(), 1);

        app.previous();
        assert_eq!(app.selected_user().unwrap().id(), 4);
        app.next();
        assert_eq!(app.selected_user().unwrap().id(), 1);

        app.page_down();
        assert_eq!(app.users_state.selected(), Some(3));
        app.page_up();
        assert_eq!(app.users_state.selected(), Some(0));
    }

    #[test]
    fn test_pages_keep_their_own_selection() {
        let mut app = app();
        app.next();
        app.next_page();
        assert_eq!(app.current_page, Page::Resources);
        app.last();
        assert_eq!(app.selected_resource().unwrap().name(), "Admin Panel");

        app.previous_page();
        assert_eq!(app.selected_user().unwrap().id(), 2);
    }

    #[test]
    fn test_sort_and_access_count() {
        let mut app = app();
        app.last();
        let admin = app.selected_user().unwrap().clone();
        assert_eq!(app.access_count(&admin), (3, 3));

        app.sort_by_access_level();
        assert!(app.sorted);
        let levels: Vec<i32> = app.system.users().iter().map(|u| u.access_level()).collect();
        assert_eq!(levels, vec![2, 2, 3, 5]);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Admin Panel", 20), "Admin Panel");
        assert_eq!(truncate("University Library", 10), "Univers...");
    }
}
