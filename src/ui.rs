use anyhow::Result;
use clinic_desk::input::{format_clock, format_date};
use clinic_desk::{AgendaQuery, Appointment, ClinicDesk, Patient, Removal, SortKey};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Patients,
    Agenda,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Patients => Page::Agenda,
            Page::Agenda => Page::Patients,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Patients => "Patients",
            Page::Agenda => "Agenda",
        }
    }
}

// ============================================================================
// FORMS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    RegisterPatient,
    BookAppointment,
    AgendaRange,
}

impl FormKind {
    fn title(&self) -> &'static str {
        match self {
            FormKind::RegisterPatient => " Register Patient ",
            FormKind::BookAppointment => " Book Appointment ",
            FormKind::AgendaRange => " Agenda by Date Range ",
        }
    }

    fn labels(&self) -> &'static [&'static str] {
        match self {
            FormKind::RegisterPatient => &["ID", "Name", "Birth date (DD/MM/YYYY)"],
            FormKind::BookAppointment => &["Patient ID", "Date (DD/MM/YYYY)", "Start (HHMM)", "End (HHMM)"],
            FormKind::AgendaRange => &["From (DD/MM/YYYY)", "To (DD/MM/YYYY)"],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Form {
    pub kind: FormKind,
    pub values: Vec<String>,
    pub focus: usize,
}

impl Form {
    pub fn new(kind: FormKind) -> Self {
        Form {
            kind,
            values: vec![String::new(); kind.labels().len()],
            focus: 0,
        }
    }

    fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.values.len();
    }

    fn previous_field(&mut self) {
        self.focus = (self.focus + self.values.len() - 1) % self.values.len();
    }

    fn focused_mut(&mut self) -> Option<&mut String> {
        self.values.get_mut(self.focus)
    }

    fn value(&self, index: usize) -> &str {
        self.values.get(index).map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Success(String),
    Error(String),
}

impl Status {
    fn style(&self) -> Style {
        match self {
            Status::Info(_) => Style::default().fg(Color::Cyan),
            Status::Success(_) => Style::default().fg(Color::Green),
            Status::Error(_) => Style::default().fg(Color::Red),
        }
    }

    fn text(&self) -> &str {
        match self {
            Status::Info(s) | Status::Success(s) | Status::Error(s) => s,
        }
    }
}

// ============================================================================
// APP
// ============================================================================

pub struct App {
    pub desk: ClinicDesk,
    pub current_page: Page,
    pub patients_state: TableState,
    pub agenda_state: TableState,
    pub sort_key: SortKey,
    pub agenda_query: AgendaQuery,
    pub form: Option<Form>,
    pub status: Status,
    patients: Vec<Patient>,
    agenda: Vec<Appointment>,
}

impl App {
    pub fn new(desk: ClinicDesk) -> Self {
        let mut app = Self {
            desk,
            current_page: Page::Patients,
            patients_state: TableState::default(),
            agenda_state: TableState::default(),
            sort_key: SortKey::Id,
            agenda_query: AgendaQuery::All,
            form: None,
            status: Status::Info("Press n to register a patient".to_string()),
            patients: Vec::new(),
            agenda: Vec::new(),
        };
        app.refresh();
        app
    }

    /// Re-read both listings from the desk
    pub fn refresh(&mut self) {
        self.patients = self.desk.list_patients(self.sort_key);
        match self.desk.list_appointments(&self.agenda_query) {
            Ok(agenda) => self.agenda = agenda,
            Err(err) => {
                self.status = Status::Error(format!("Agenda: {}", err));
                self.agenda_query = AgendaQuery::All;
                self.agenda = self.desk.list_appointments(&AgendaQuery::All).unwrap_or_default();
            }
        }
        clamp_selection(&mut self.patients_state, self.patients.len());
        clamp_selection(&mut self.agenda_state, self.agenda.len());
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn agenda(&self) -> &[Appointment] {
        &self.agenda
    }

    pub fn selected_patient(&self) -> Option<&Patient> {
        self.patients_state.selected().and_then(|i| self.patients.get(i))
    }

    pub fn selected_appointment(&self) -> Option<&Appointment> {
        self.agenda_state.selected().and_then(|i| self.agenda.get(i))
    }

    /// Returns true when the operator asked to quit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.form.is_some() {
            self.handle_form_key(key);
            return false;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab | KeyCode::BackTab => self.current_page = self.current_page.next(),
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::Char('b') => {
                let mut form = Form::new(FormKind::BookAppointment);
                if self.current_page == Page::Patients {
                    if let Some(patient) = self.selected_patient() {
                        form.values[0] = patient.id.clone();
                        form.focus = 1;
                    }
                }
                self.form = Some(form);
            }
            KeyCode::Char('n') if self.current_page == Page::Patients => {
                self.form = Some(Form::new(FormKind::RegisterPatient));
            }
            KeyCode::Char('d') if self.current_page == Page::Patients => self.remove_selected(),
            KeyCode::Char('s') if self.current_page == Page::Patients => {
                self.sort_key = self.sort_key.toggle();
                self.status = Status::Info(format!("Sorted by {}", self.sort_key.as_str()));
                self.refresh();
            }
            KeyCode::Char('x') if self.current_page == Page::Agenda => self.cancel_selected(),
            KeyCode::Char('r') if self.current_page == Page::Agenda => {
                self.form = Some(Form::new(FormKind::AgendaRange));
            }
            KeyCode::Char('a') if self.current_page == Page::Agenda => {
                self.agenda_query = AgendaQuery::All;
                self.status = Status::Info("Showing the full agenda".to_string());
                self.refresh();
            }
            _ => {}
        }
        false
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let Some(form) = self.form.as_mut() else {
            return;
        };

        match key.code {
            KeyCode::Esc => self.form = None,
            KeyCode::Enter => self.submit_form(),
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => {
                if let Some(value) = form.focused_mut() {
                    value.pop();
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(value) = form.focused_mut() {
                    value.push(c);
                }
            }
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        let Some(form) = self.form.take() else {
            return;
        };

        match form.kind {
            FormKind::RegisterPatient => {
                match self.desk.register_patient(form.value(0), form.value(1), form.value(2)) {
                    Ok(patient) => self.status = Status::Success(format!("Patient {} registered", patient.id)),
                    Err(err) => {
                        self.status = Status::Error(format!("Registration rejected: {}", err));
                        self.form = Some(form);
                    }
                }
            }
            FormKind::BookAppointment => {
                match self
                    .desk
                    .book_appointment(form.value(0), form.value(1), form.value(2), form.value(3))
                {
                    Ok(confirmation) => {
                        self.status = Status::Success(confirmation.message);
                        self.current_page = Page::Agenda;
                    }
                    Err(err) => {
                        self.status = Status::Error(format!("Booking rejected: {}", err));
                        self.form = Some(form);
                    }
                }
            }
            FormKind::AgendaRange => {
                let query = AgendaQuery::DateRange {
                    from: form.value(0).to_string(),
                    to: form.value(1).to_string(),
                };
                match self.desk.list_appointments(&query) {
                    Ok(_) => {
                        self.status = Status::Info(format!("Agenda from {} to {}", form.value(0), form.value(1)));
                        self.agenda_query = query;
                    }
                    Err(err) => {
                        self.status = Status::Error(format!("Range rejected: {}", err));
                        self.form = Some(form);
                    }
                }
            }
        }

        self.refresh();
    }

    fn remove_selected(&mut self) {
        let Some(id) = self.selected_patient().map(|p| p.id.clone()) else {
            self.status = Status::Info("No patient selected".to_string());
            return;
        };

        self.status = match self.desk.remove_patient(&id) {
            Ok(Removal::Removed { patient, cancelled }) => Status::Success(format!(
                "Patient {} removed ({} past appointment(s) cleared)",
                patient.id,
                cancelled.len()
            )),
            Ok(Removal::Blocked { pending }) => Status::Error(format!(
                "Patient {} has a future appointment on {} at {}; cancel it first",
                pending.patient_id,
                format_date(pending.date),
                format_clock(pending.start_time)
            )),
            Err(err) => Status::Error(format!("Removal rejected: {}", err)),
        };
        self.refresh();
    }

    fn cancel_selected(&mut self) {
        let Some(id) = self.selected_appointment().map(|a| a.patient_id.clone()) else {
            self.status = Status::Info("No appointment selected".to_string());
            return;
        };

        self.status = if self.desk.cancel_appointment(&id) {
            Status::Success(format!("Future appointment of {} cancelled", id))
        } else {
            Status::Error(format!("{} has no future appointment to cancel", id))
        };
        self.refresh();
    }

    fn active_state(&mut self) -> (&mut TableState, usize) {
        match self.current_page {
            Page::Patients => (&mut self.patients_state, self.patients.len()),
            Page::Agenda => (&mut self.agenda_state, self.agenda.len()),
        }
    }

    pub fn next(&mut self) {
        let (state, len) = self.active_state();
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let (state, len) = self.active_state();
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        state.select(Some(i));
    }
}

fn clamp_selection(state: &mut TableState, len: usize) {
    match state.selected() {
        _ if len == 0 => state.select(None),
        Some(i) if i >= len => state.select(Some(len - 1)),
        None => state.select(Some(0)),
        Some(_) => {}
    }
}

// ============================================================================
// TERMINAL LOOP
// ============================================================================

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.map_err(Into::into)
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

// ============================================================================
// RENDERING
// ============================================================================

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

    match app.current_page {
        Page::Patients => render_patients(f, chunks[1], app),
        Page::Agenda => render_agenda(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);

    if let Some(form) = &app.form {
        render_form(f, f.size(), form);
    }
}

fn header_style() -> Style {
    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![];
    for (i, page) in [Page::Patients, Page::Agenda].iter().enumerate() {
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

        tab_spans.push(Span::styled(page.title(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Patients: {}", app.desk.patients().count()),
        Style::default().fg(Color::White),
    ));
    tab_spans.push(Span::raw("  "));
    tab_spans.push(Span::styled(
        format!("Appointments: {}", app.desk.appointments().count()),
        Style::default().fg(Color::Green),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_patients(f: &mut Frame, area: Rect, app: &mut App) {
    let header = Row::new(["ID", "Name", "Birth date"].iter().map(|h| Cell::from(*h).style(header_style())))
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.patients.iter().map(|p| {
        Row::new(vec![
            Cell::from(p.id.clone()),
            Cell::from(p.name.clone()),
            Cell::from(format_date(p.birth_date)),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [Constraint::Length(16), Constraint::Min(20), Constraint::Length(12)],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" Patients by {} ", app.sort_key.as_str())),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.patients_state);
}

fn render_agenda(f: &mut Frame, area: Rect, app: &mut App) {
    let header = Row::new(
        ["Patient ID", "Date", "Start", "End", "Minutes"]
            .iter()
            .map(|h| Cell::from(*h).style(header_style())),
    )
    .style(Style::default().bg(Color::DarkGray))
    .height(1);

    let rows = app.agenda.iter().map(|a| {
        Row::new(vec![
            Cell::from(a.patient_id.clone()),
            Cell::from(format_date(a.date)),
            Cell::from(format_clock(a.start_time)),
            Cell::from(format_clock(a.end_time())),
            Cell::from(a.duration_minutes.to_string()),
        ])
        .height(1)
    });

    let title = match &app.agenda_query {
        AgendaQuery::All => " Agenda - all appointments ".to_string(),
        AgendaQuery::DateRange { from, to } => format!(" Agenda - {} to {} ", from, to),
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(16),
            Constraint::Length(12),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.agenda_state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let key = Style::default().fg(Color::Yellow);
    let mut spans = vec![Span::styled(format!(" {} ", app.status.text()), app.status.style()), Span::raw("| ")];

    let hints: &[(&str, &str)] = match (app.form.is_some(), app.current_page) {
        (true, _) => &[("Enter", "Submit"), ("Tab", "Field"), ("Esc", "Close")],
        (false, Page::Patients) => &[("n", "New"), ("d", "Remove"), ("b", "Book"), ("s", "Sort"), ("Tab", "Page"), ("q", "Quit")],
        (false, Page::Agenda) => &[("b", "Book"), ("x", "Cancel"), ("r", "Range"), ("a", "All"), ("Tab", "Page"), ("q", "Quit")],
    };

    for (k, label) in hints {
        spans.push(Span::styled(*k, key));
        spans.push(Span::raw(format!(" {} ", label)));
    }

    let status_bar = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::White)));

    f.render_widget(status_bar, area);
}

fn render_form(f: &mut Frame, area: Rect, form: &Form) {
    let height = form.values.len() as u16 * 2 + 3;
    let popup = centered_rect(area, 60, height);

    let mut lines = vec![Line::from("")];
    for (i, (label, value)) in form.kind.labels().iter().zip(&form.values).enumerate() {
        let focused = i == form.focus;
        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        let cursor = if focused { "_" } else { "" };

        lines.push(Line::from(vec![
            Span::styled(format!("  {}: ", label), label_style),
            Span::raw(format!("{}{}", value, cursor)),
        ]));
        lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(form.kind.title()),
    );

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

// ============================================================================
// TESTS
// ============================================================================
