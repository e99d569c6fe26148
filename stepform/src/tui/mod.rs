//! Terminal front-end for the registration wizard.
//!
//! Layout:
//! - Centered window frame titled "Stepform Registration"
//! - Left panel with the step list (done / current / upcoming)
//! - Main content panel with the current page's fields and their inline errors
//! - Bottom button row: [ Previous ] [ Next ] [ Cancel ]
//! - Modal confirmations (Cancel, credential problems on submit)
//!
//! Note: Logging is file-only in TUI mode (stdout logging is disabled) to avoid corrupting the terminal UI.

use crate::form::{
    AdvanceOutcome, ChangeOutcome, FieldId, Step, WizardController, WizardError, WizardState,
};
use crate::models::submission::FinalizedSubmission;
use crate::theme::{Palette, ThemeController};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use log::{info, warn};
use ratatui::backend::{CrosstermBackend, TestBackend};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Terminal;
use std::collections::HashMap;
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

const WINDOW_TITLE: &str = "Stepform Registration";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ButtonFocus {
    Back,
    Next,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Modal {
    ConfirmCancel,
    Message { title: String, body: String },
}

/// Editable line. `cursor` is a byte offset that always sits on a char boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    fn display(&self, masked: bool) -> String {
        if masked {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }

    fn prev_boundary(&self) -> usize {
        self.value[..self.cursor]
            .chars()
            .next_back()
            .map(|c| self.cursor - c.len_utf8())
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.value[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
            .unwrap_or(self.value.len())
    }

    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char(c) => {
                self.value.insert(self.cursor, c);
                self.cursor += c.len_utf8();
                true
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    let idx = self.prev_boundary();
                    self.value.replace_range(idx..self.cursor, "");
                    self.cursor = idx;
                }
                true
            }
            KeyCode::Delete => {
                if self.cursor < self.value.len() {
                    let end = self.next_boundary();
                    self.value.replace_range(self.cursor..end, "");
                }
                true
            }
            KeyCode::Left => {
                self.cursor = self.prev_boundary();
                true
            }
            KeyCode::Right => {
                self.cursor = self.next_boundary();
                true
            }
            KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::End => {
                self.cursor = self.value.len();
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FocusTarget {
    Field(usize),
    Button(ButtonFocus),
}

/// Screen-level state. The wizard owns every value; `inputs` only mirrors them with a cursor.
struct UiState {
    wizard: WizardController,
    inputs: HashMap<FieldId, TextInput>,
    focus: FocusTarget,
    modal: Option<Modal>,
    theme: ThemeController,
    reveal_secrets: bool,
    quit: bool,
}

impl UiState {
    fn new(wizard: WizardController, theme: ThemeController) -> Self {
        let mut state = Self {
            wizard,
            inputs: HashMap::new(),
            focus: FocusTarget::Field(0),
            modal: None,
            theme,
            reveal_secrets: false,
            quit: false,
        };
        reset_focus(&mut state);
        state
    }
}

fn page_fields(state: &UiState) -> &'static [FieldId] {
    state
        .wizard
        .current_step()
        .map(|s| s.fields())
        .unwrap_or(&[])
}

fn focused_field(state: &UiState) -> Option<FieldId> {
    match state.focus {
        FocusTarget::Field(i) => page_fields(state).get(i).copied(),
        FocusTarget::Button(_) => None,
    }
}

fn focused_button(state: &UiState) -> ButtonFocus {
    match state.focus {
        FocusTarget::Button(b) => b,
        _ => ButtonFocus::Next,
    }
}

fn set_focused_button(state: &mut UiState, b: ButtonFocus) {
    state.focus = FocusTarget::Button(b);
}

fn reset_focus(state: &mut UiState) {
    if page_fields(state).is_empty() {
        set_focused_button(state, ButtonFocus::Next);
    } else {
        state.focus = FocusTarget::Field(0);
    }
}

fn focus_field(state: &mut UiState, field: FieldId) {
    match page_fields(state).iter().position(|f| *f == field) {
        Some(i) => state.focus = FocusTarget::Field(i),
        None => reset_focus(state),
    }
}

fn next_label(state: &UiState) -> &'static str {
    match state.wizard.state() {
        WizardState::Editing(Step::Summary) => "Submit",
        WizardState::Editing(_) => "Next",
        WizardState::Submitted => "Submit Another Form",
    }
}

fn can_go_back(state: &UiState) -> bool {
    matches!(state.wizard.current_step(), Some(s) if s.prev().is_some())
}

pub fn run(theme: ThemeController) -> Result<()> {
    info!("[PHASE: tui] [STEP: start] Starting TUI wizard");

    let mut terminal = setup_terminal()?;
    let result = run_loop(&mut terminal, theme);
    restore_terminal(&mut terminal)?;

    result
}

fn new_real_ui_state(theme: ThemeController) -> UiState {
    // Real interactive run: no seeded values. Only `smoke(...)` injects sample state.
    UiState::new(WizardController::default(), theme)
}

fn fill_step(wizard: &mut WizardController, step: Step) -> Result<()> {
    for (field, value) in crate::smoke::HAPPY_PATH
        .iter()
        .filter(|(f, _)| f.step() == step)
    {
        wizard.handle_change(*field, *value)?;
    }
    Ok(())
}

fn sync_inputs(state: &mut UiState) {
    let mut inputs = HashMap::new();
    for step in Step::FORMS {
        if let Some(form) = state.wizard.form(step) {
            for field in step.fields() {
                let value = form.value(*field).to_string();
                inputs.insert(
                    *field,
                    TextInput {
                        cursor: value.len(),
                        value,
                    },
                );
            }
        }
    }
    state.inputs = inputs;
}

fn new_smoke_ui_state(target: &str, theme: ThemeController) -> Result<UiState> {
    // Smoke-only: seeded state for deterministic page rendering in CI/tooling.
    // Submissions go nowhere.
    let mut wizard = WizardController::new(Arc::new(|_: &FinalizedSubmission| {}));

    // "submitted" is the summary page plus one more Next.
    let submitted = target == "submitted";
    let page = if submitted {
        Step::Summary
    } else {
        Step::from_id(target).unwrap_or_else(|| {
            warn!(
                "[PHASE: tui] [STEP: smoke] Unknown smoke target '{}', rendering the first page",
                target
            );
            Step::PersonalInfo
        })
    };
    let pages_to_fill = usize::from(page.number() - 1);

    if pages_to_fill == 0 {
        // Show the inline error rendering: a name, a bad email, then a blocked "Next".
        wizard.handle_change(FieldId::FullName, "Ada Lovelace")?;
        wizard.handle_change(FieldId::Email, "ada@example")?;
        wizard.advance()?;
    }
    for step in Step::FORMS.iter().take(pages_to_fill) {
        fill_step(&mut wizard, *step)?;
        match wizard.advance()? {
            AdvanceOutcome::Advanced(_) => {}
            other => anyhow::bail!("Seeded page {} did not advance: {:?}", step, other),
        }
    }
    if submitted {
        wizard.advance()?;
    }

    let mut state = UiState::new(wizard, theme);
    sync_inputs(&mut state);
    set_focused_button(&mut state, ButtonFocus::Next);
    Ok(state)
}

/// Non-interactive smoke mode: render a single frame and exit.
/// Target pages: personal|address|account|summary|submitted
pub fn smoke(theme: ThemeController, target: &str) -> Result<()> {
    info!(
        "[PHASE: tui] [STEP: smoke] Rendering single-frame TUI smoke target={}",
        target
    );

    let t = target.trim().to_ascii_lowercase();
    let state = new_smoke_ui_state(t.as_str(), theme)?;

    // In-memory backend: no raw mode, no alternate screen.
    let backend = TestBackend::new(100, 30);
    let mut terminal = Terminal::new(backend)?;
    terminal.draw(|f| draw(f.size(), f, &state))?;

    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, theme: ThemeController) -> Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();
    let mut state = new_real_ui_state(theme);

    while !state.quit {
        terminal.draw(|f| draw(f.size(), f, &state))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_millis(0));

        if event::poll(timeout)? {
            match event::read()? {
                // Windows reports releases too.
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key(&mut state, key.code)
                }
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }

    info!("[PHASE: tui] [STEP: exit] TUI wizard closed");
    Ok(())
}

fn handle_key(state: &mut UiState, code: KeyCode) {
    // Modal handling
    if let Some(modal) = state.modal.clone() {
        match modal {
            Modal::ConfirmCancel => match code {
                KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                    let next = match focused_button(state) {
                        ButtonFocus::Cancel => ButtonFocus::Next,
                        _ => ButtonFocus::Cancel,
                    };
                    set_focused_button(state, next);
                }
                KeyCode::Enter => {
                    let confirm = focused_button(state) == ButtonFocus::Cancel;
                    state.modal = None;
                    if confirm {
                        info!("[PHASE: tui] [STEP: cancel] User cancelled the wizard");
                        state.quit = true;
                    } else {
                        reset_focus(state);
                    }
                }
                KeyCode::Esc => {
                    state.modal = None;
                    reset_focus(state);
                }
                _ => {}
            },
            Modal::Message { .. } => {
                if matches!(code, KeyCode::Enter | KeyCode::Esc) {
                    state.modal = None;
                }
            }
        }
        return;
    }

    // Global keys
    match code {
        KeyCode::Esc => {
            state.modal = Some(Modal::ConfirmCancel);
            set_focused_button(state, ButtonFocus::Next); // "No"
            return;
        }
        KeyCode::F(2) => {
            state.theme.toggle();
            return;
        }
        KeyCode::F(3) => {
            state.reveal_secrets = !state.reveal_secrets;
            return;
        }
        _ => {}
    }

    // Text input handling (when a field is focused)
    if let Some(field) = focused_field(state) {
        if edit_field(state, field, code) {
            return;
        }
    }

    let fields = page_fields(state).len();
    match code {
        KeyCode::Tab | KeyCode::Down => {
            state.focus = match state.focus {
                FocusTarget::Field(i) if i + 1 < fields => FocusTarget::Field(i + 1),
                FocusTarget::Field(_) => FocusTarget::Button(ButtonFocus::Back),
                FocusTarget::Button(ButtonFocus::Back) => FocusTarget::Button(ButtonFocus::Next),
                FocusTarget::Button(ButtonFocus::Next) => FocusTarget::Button(ButtonFocus::Cancel),
                FocusTarget::Button(ButtonFocus::Cancel) if fields > 0 => FocusTarget::Field(0),
                FocusTarget::Button(ButtonFocus::Cancel) => FocusTarget::Button(ButtonFocus::Back),
            };
        }
        KeyCode::BackTab | KeyCode::Up => {
            state.focus = match state.focus {
                FocusTarget::Field(0) => FocusTarget::Button(ButtonFocus::Cancel),
                FocusTarget::Field(i) => FocusTarget::Field(i - 1),
                FocusTarget::Button(ButtonFocus::Cancel) => FocusTarget::Button(ButtonFocus::Next),
                FocusTarget::Button(ButtonFocus::Next) => FocusTarget::Button(ButtonFocus::Back),
                FocusTarget::Button(ButtonFocus::Back) if fields > 0 => {
                    FocusTarget::Field(fields - 1)
                }
                FocusTarget::Button(ButtonFocus::Back) => FocusTarget::Button(ButtonFocus::Cancel),
            };
        }
        KeyCode::Left | KeyCode::Right => {
            if let FocusTarget::Button(b) = state.focus {
                let next = match (b, code) {
                    (ButtonFocus::Back, KeyCode::Right) => ButtonFocus::Next,
                    (ButtonFocus::Next, KeyCode::Right) => ButtonFocus::Cancel,
                    (ButtonFocus::Next, KeyCode::Left) => ButtonFocus::Back,
                    (ButtonFocus::Cancel, KeyCode::Left) => ButtonFocus::Next,
                    (b, _) => b,
                };
                set_focused_button(state, next);
            }
        }
        KeyCode::Enter => {
            match focused_button(state) {
                ButtonFocus::Back => {
                    if can_go_back(state) {
                        go_back(state);
                    }
                }
                ButtonFocus::Next if state.wizard.is_submitted() => submit_another(state),
                ButtonFocus::Next => go_next(state),
                ButtonFocus::Cancel => {
                    state.modal = Some(Modal::ConfirmCancel);
                    set_focused_button(state, ButtonFocus::Next);
                }
            }
        }
        _ => {}
    }
}

/// Apply a key to a copy of the field's input and commit it only if the wizard accepts the value.
fn edit_field(state: &mut UiState, field: FieldId, code: KeyCode) -> bool {
    let mut candidate = state.inputs.get(&field).cloned().unwrap_or_default();
    if !candidate.handle_key(code) {
        return false;
    }

    let unchanged = state
        .inputs
        .get(&field)
        .map(|i| i.value == candidate.value)
        .unwrap_or(candidate.value.is_empty());
    if unchanged {
        state.inputs.insert(field, candidate);
        return true;
    }

    match state.wizard.handle_change(field, candidate.value.clone()) {
        Ok(ChangeOutcome::Accepted(_)) => {
            state.inputs.insert(field, candidate);
        }
        Ok(ChangeOutcome::Rejected) => {}
        Err(e) => warn!(
            "[PHASE: tui] [STEP: input] Edit for {} ignored: {}",
            field.key(),
            e
        ),
    }
    true
}

fn go_next(state: &mut UiState) {
    match state.wizard.advance() {
        Ok(AdvanceOutcome::Advanced(_)) | Ok(AdvanceOutcome::Submitted(_)) => reset_focus(state),
        Ok(AdvanceOutcome::Blocked(failing)) => {
            if let Some(first) = page_fields(state).iter().find(|f| failing.contains(*f)) {
                focus_field(state, *first);
            }
        }
        Err(WizardError::CredentialsInvalid(failing)) => {
            let names: Vec<&str> = failing.iter().map(|f| f.label()).collect();
            state.modal = Some(Modal::Message {
                title: "Check your account details".to_string(),
                body: format!(
                    "These fields need attention before submitting: {}",
                    names.join(", ")
                ),
            });
            match failing.first() {
                Some(f) => focus_field(state, *f),
                None => reset_focus(state),
            }
        }
        Err(e) => warn!("[PHASE: tui] [STEP: next] {}", e),
    }
}

fn go_back(state: &mut UiState) {
    match state.wizard.retreat() {
        Ok(_) => reset_focus(state),
        Err(e) => warn!("[PHASE: tui] [STEP: back] {}", e),
    }
}

fn submit_another(state: &mut UiState) {
    state.wizard.reset();
    state.inputs.clear();
    state.reveal_secrets = false;
    reset_focus(state);
}

fn draw(area: Rect, f: &mut ratatui::Frame<'_>, state: &UiState) {
    let palette = state.theme.palette();
    let base = Style::default().fg(palette.text).bg(palette.background);
    let window_area = centered_window(area, 100, 30);

    // Outer frame
    f.render_widget(Clear, window_area);
    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title(WINDOW_TITLE)
        .style(base);
    f.render_widget(outer_block, window_area);

    // Inner layout: steps + content, hint line, buttons row
    let inner = window_area.inner(&ratatui::layout::Margin {
        vertical: 1,
        horizontal: 1,
    });
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(inner);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(0)].as_ref())
        .split(rows[0]);

    draw_steps(f, cols[0], state, &palette);

    let title = match state.wizard.current_step() {
        Some(step) => step.title(),
        None => "Complete",
    };
    let content_block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(palette.muted));
    f.render_widget(content_block, cols[1]);
    let content_inner = cols[1].inner(&ratatui::layout::Margin {
        vertical: 1,
        horizontal: 1,
    });

    let content_text = match state.wizard.state() {
        WizardState::Editing(Step::Summary) => summary_text(state, &palette),
        WizardState::Editing(step) => form_text(state, step, &palette),
        WizardState::Submitted => submitted_text(state, &palette),
    };
    let content = Paragraph::new(content_text)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });
    f.render_widget(content, content_inner);

    let theme_hint = if state.theme.is_dark() {
        "F2: light mode"
    } else {
        "F2: dark mode"
    };
    let secret_hint = if state.reveal_secrets {
        "F3: hide passwords"
    } else {
        "F3: show passwords"
    };
    let hint = Paragraph::new(Line::from(format!(
        "Tab/Up/Down: move  Enter: {}  {}  {}  Esc: cancel",
        next_label(state).to_ascii_lowercase(),
        theme_hint,
        secret_hint
    )))
    .style(Style::default().fg(palette.muted));
    f.render_widget(hint, rows[1]);

    // Bottom buttons row (right-aligned)
    draw_buttons(f, rows[2], state, &palette);

    // Modal overlay
    if let Some(modal) = state.modal.as_ref() {
        match modal {
            Modal::ConfirmCancel => draw_cancel_modal(f, window_area, state, &palette),
            Modal::Message { title, body } => {
                draw_message_modal(f, window_area, title, body, &palette)
            }
        }
    }
}

fn draw_steps(f: &mut ratatui::Frame<'_>, area: Rect, state: &UiState, palette: &Palette) {
    let current = state.wizard.current_step();
    let mut lines = vec![Line::from(""), Line::from("")];
    for step in Step::ALL {
        let done = match current {
            Some(c) => step.number() < c.number(),
            None => true,
        };
        let (marker, style) = if Some(step) == current {
            (
                ">",
                Style::default()
                    .fg(palette.primary)
                    .add_modifier(Modifier::BOLD),
            )
        } else if done {
            ("\u{2713}", Style::default().fg(palette.success))
        } else {
            (" ", Style::default().fg(palette.muted))
        };
        lines.push(Line::from(Span::styled(
            format!(" {} {}. {}", marker, step.number(), step.label()),
            style,
        )));
        lines.push(Line::from(""));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Steps")
        .border_style(Style::default().fg(palette.muted));
    let p = Paragraph::new(Text::from(lines)).block(block);
    f.render_widget(p, area);
}

fn form_text(state: &UiState, step: Step, palette: &Palette) -> Text<'static> {
    let Some(form) = state.wizard.form(step) else {
        return Text::from("");
    };

    let mut lines = vec![Line::from("")];
    for (i, field) in step.fields().iter().enumerate() {
        let focused = state.focus == FocusTarget::Field(i);
        let marker = if focused { ">" } else { " " };
        let value = form.value(*field);
        let masked = field.is_secret() && !state.reveal_secrets;

        let mut label_style = Style::default().fg(palette.text);
        if focused {
            label_style = label_style.add_modifier(Modifier::BOLD);
        }
        let value_span = if value.is_empty() {
            Span::styled(field.placeholder().to_string(), Style::default().fg(palette.muted))
        } else {
            let shown = match state.inputs.get(field) {
                Some(input) if input.value == value => input.display(masked),
                _ => TextInput {
                    value: value.to_string(),
                    cursor: value.len(),
                }
                .display(masked),
            };
            Span::styled(shown, Style::default().fg(palette.text))
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{} {}: ", marker, field.label()), label_style),
            value_span,
        ]));
        match form.visible_error(*field) {
            Some(message) => lines.push(Line::from(Span::styled(
                format!("    {}", message),
                Style::default().fg(palette.error),
            ))),
            None => lines.push(Line::from("")),
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Step {} of {}", step.number(), Step::ALL.len()),
        Style::default().fg(palette.muted),
    )));
    Text::from(lines)
}

fn summary_text(state: &UiState, palette: &Palette) -> Text<'static> {
    let record = if state.reveal_secrets {
        state.wizard.preview()
    } else {
        state.wizard.summary()
    };
    let heading = |s: &str| {
        Line::from(Span::styled(
            s.to_string(),
            Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD),
        ))
    };
    let row = |label: &str, value: &str| Line::from(format!("  {}: {}", label, value));

    Text::from(vec![
        heading(Step::PersonalInfo.title()),
        row(FieldId::FullName.label(), &record.personal_info.full_name),
        row(FieldId::Email.label(), &record.personal_info.email),
        row(FieldId::PhoneNumber.label(), &record.personal_info.phone_number),
        Line::from(""),
        heading(Step::Address.title()),
        row(FieldId::StreetAddress.label(), &record.address.street_address),
        row(FieldId::City.label(), &record.address.city),
        row(FieldId::ZipCode.label(), &record.address.zip_code),
        Line::from(""),
        heading(Step::Account.title()),
        row(FieldId::Username.label(), &record.account.username),
        row(FieldId::Password.label(), &record.account.password),
        Line::from(""),
        Line::from(Span::styled(
            "Select Submit to send the form, or Previous to make changes.",
            Style::default().fg(palette.muted),
        )),
    ])
}

fn submitted_text(state: &UiState, palette: &Palette) -> Text<'static> {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Form Submitted Successfully!",
            Style::default()
                .fg(palette.success)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    if let Some(record) = state.wizard.last_submission() {
        lines.push(Line::from(format!(
            "Thank you, {}. Your registration has been received.",
            record.personal_info.full_name
        )));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "Select Submit Another Form to start over, or Cancel to exit.",
        Style::default().fg(palette.muted),
    )));
    Text::from(lines)
}

fn centered_window(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width.saturating_sub(2)).max(60).min(area.width);
    let h = height.min(area.height.saturating_sub(2)).max(20).min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect {
        x,
        y,
        width: w,
        height: h,
    }
}

fn draw_buttons(f: &mut ratatui::Frame<'_>, area: Rect, state: &UiState, palette: &Palette) {
    let back = button_text(
        "Previous",
        matches!(state.focus, FocusTarget::Button(ButtonFocus::Back)),
        can_go_back(state),
        palette,
    );
    let next = button_text(
        next_label(state),
        matches!(state.focus, FocusTarget::Button(ButtonFocus::Next)),
        true,
        palette,
    );
    let cancel = button_text(
        "Cancel",
        matches!(state.focus, FocusTarget::Button(ButtonFocus::Cancel)),
        true,
        palette,
    );

    let line = Line::from(vec![back, Span::raw(" "), next, Span::raw(" "), cancel]);

    let p = Paragraph::new(Text::from(line)).alignment(Alignment::Right);
    f.render_widget(p, area);
}

fn button_text(label: &str, focused: bool, enabled: bool, palette: &Palette) -> Span<'static> {
    let mut style = Style::default().fg(palette.primary);
    if !enabled {
        style = style.fg(palette.muted);
    }
    if focused && enabled {
        style = style.add_modifier(Modifier::REVERSED);
    }
    Span::styled(format!("[ {} ]", label), style)
}

fn modal_area(window_area: Rect, width: u16, height: u16) -> Rect {
    let modal_w = width.min(window_area.width.saturating_sub(4)).max(40);
    let modal_h = height.min(window_area.height.saturating_sub(4)).max(7);
    let x = window_area.x + (window_area.width.saturating_sub(modal_w)) / 2;
    let y = window_area.y + (window_area.height.saturating_sub(modal_h)) / 2;
    Rect {
        x,
        y,
        width: modal_w,
        height: modal_h,
    }
}

fn modal_buttons_area(area: Rect) -> Rect {
    Rect {
        x: area.x + 1,
        y: area.y + area.height.saturating_sub(2),
        width: area.width.saturating_sub(2),
        height: 1,
    }
}

fn draw_cancel_modal(
    f: &mut ratatui::Frame<'_>,
    window_area: Rect,
    state: &UiState,
    palette: &Palette,
) {
    let area = modal_area(window_area, 56, 7);
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Cancel Registration?")
        .style(Style::default().fg(palette.text).bg(palette.surface));
    let body = Paragraph::new(Text::from(vec![
        Line::from("If you cancel now, everything entered will be lost."),
        Line::from(""),
        Line::from(""),
    ]))
    .block(block)
    .wrap(Wrap { trim: false });
    f.render_widget(body, area);

    // Buttons: [Yes, cancel] [No] (primary on right)
    let highlight = |focused: bool| {
        if focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        }
    };
    let yes = Span::styled(
        "[ Yes, cancel ]",
        highlight(focused_button(state) == ButtonFocus::Cancel),
    );
    let no = Span::styled("[ No ]", highlight(focused_button(state) == ButtonFocus::Next));

    let line = Line::from(vec![yes, Span::raw(" "), no]);
    let p = Paragraph::new(Text::from(line)).alignment(Alignment::Right);
    f.render_widget(p, modal_buttons_area(area));
}

fn draw_message_modal(
    f: &mut ratatui::Frame<'_>,
    window_area: Rect,
    title: &str,
    body: &str,
    palette: &Palette,
) {
    let area = modal_area(window_area, 70, 10);
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            title.to_string(),
            Style::default().fg(palette.error),
        ))
        .style(Style::default().fg(palette.text).bg(palette.surface));
    let p = Paragraph::new(Text::from(body.to_string()))
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(p, area);

    let ok = Span::styled("[ OK ]", Style::default().add_modifier(Modifier::REVERSED));
    let p = Paragraph::new(Text::from(Line::from(vec![ok]))).alignment(Alignment::Right);
    f.render_widget(p, modal_buttons_area(area));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::MemorySubmissionSink;
    use crate::theme::{InMemoryPreferenceStore, SystemThemeSignal, ThemeMode};

    fn theme() -> ThemeController {
        ThemeController::load(
            Box::new(InMemoryPreferenceStore::new(None)),
            &SystemThemeSignal::Fixed(false),
        )
    }

    fn ui() -> (UiState, MemorySubmissionSink) {
        let sink = MemorySubmissionSink::new();
        let wizard = WizardController::new(Arc::new(sink.clone()));
        (UiState::new(wizard, theme()), sink)
    }

    fn type_str(state: &mut UiState, s: &str) {
        for c in s.chars() {
            handle_key(state, KeyCode::Char(c));
        }
    }

    fn press(state: &mut UiState, codes: &[KeyCode]) {
        for code in codes {
            handle_key(state, *code);
        }
    }

    fn render(state: &UiState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f.size(), f, state)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer.get(x, y).symbol());
            }
            out.push('\n');
        }
        out
    }

    fn fill_page(state: &mut UiState, values: &[&str]) {
        for (i, v) in values.iter().enumerate() {
            state.focus = FocusTarget::Field(i);
            type_str(state, v);
        }
        state.focus = FocusTarget::Field(0);
    }

    #[test]
    fn text_input_handles_multibyte_characters() {
        let mut input = TextInput::default();
        for c in ['c', 'a', 'f', 'é'] {
            input.handle_key(KeyCode::Char(c));
        }
        assert_eq!(input.value, "café");
        input.handle_key(KeyCode::Left);
        input.handle_key(KeyCode::Char('x'));
        assert_eq!(input.value, "cafxé");
        input.handle_key(KeyCode::End);
        input.handle_key(KeyCode::Backspace);
        assert_eq!(input.value, "cafx");
        input.handle_key(KeyCode::Home);
        input.handle_key(KeyCode::Delete);
        assert_eq!(input.value, "afx");
        assert!(!input.handle_key(KeyCode::F(5)));
    }

    #[test]
    fn typing_updates_the_wizard() {
        let (mut state, _) = ui();
        type_str(&mut state, "Jane Doe");
        let form = state.wizard.form(Step::PersonalInfo).unwrap();
        assert_eq!(form.value(FieldId::FullName), "Jane Doe");
        assert!(render(&state).contains("Jane Doe"));
    }

    #[test]
    fn non_digits_are_dropped_from_numeric_fields() {
        let (mut state, _) = ui();
        state.focus = FocusTarget::Field(2);
        type_str(&mut state, "55a5");
        let form = state.wizard.form(Step::PersonalInfo).unwrap();
        assert_eq!(form.value(FieldId::PhoneNumber), "555");
        assert_eq!(state.inputs[&FieldId::PhoneNumber].value, "555");
    }

    #[test]
    fn errors_stay_hidden_until_next_is_pressed() {
        let (mut state, _) = ui();
        assert!(!render(&state).contains("Full name is required"));

        handle_key(&mut state, KeyCode::Enter);
        assert_eq!(state.wizard.current_step(), Some(Step::PersonalInfo));
        let screen = render(&state);
        assert!(screen.contains("Full name is required"));
        assert!(screen.contains("Email is required"));
        assert_eq!(state.focus, FocusTarget::Field(0));
    }

    #[test]
    fn full_keyboard_flow_submits_and_restarts() {
        let (mut state, sink) = ui();

        fill_page(&mut state, &["Jane Doe", "jane@example.com", "5551234567"]);
        handle_key(&mut state, KeyCode::Enter);
        assert_eq!(state.wizard.current_step(), Some(Step::Address));

        fill_page(&mut state, &["1 Main St", "Springfield", "12345"]);
        handle_key(&mut state, KeyCode::Enter);
        assert_eq!(state.wizard.current_step(), Some(Step::Account));

        fill_page(&mut state, &["jdoe", "secret1", "secret1"]);
        assert!(!render(&state).contains("secret1"));
        handle_key(&mut state, KeyCode::Enter);
        assert_eq!(state.wizard.current_step(), Some(Step::Summary));

        let screen = render(&state);
        assert!(screen.contains("Review Your Information"));
        assert!(screen.contains("Springfield"));
        assert!(screen.contains("*******"));
        assert!(!screen.contains("secret1"));
        assert!(screen.contains("[ Submit ]"));

        handle_key(&mut state, KeyCode::Enter);
        assert!(state.wizard.is_submitted());
        assert_eq!(sink.records().len(), 1);
        assert_eq!(sink.records()[0].account.password, "secret1");
        assert!(render(&state).contains("Form Submitted Successfully!"));

        handle_key(&mut state, KeyCode::Enter);
        assert_eq!(state.wizard.current_step(), Some(Step::PersonalInfo));
        assert!(state.inputs.is_empty());
        assert!(!render(&state).contains("Jane Doe"));
    }

    #[test]
    fn submitted_page_buttons_do_what_they_say() {
        let (mut state, sink) = ui();
        fill_page(&mut state, &["Jane Doe", "jane@example.com", "5551234567"]);
        handle_key(&mut state, KeyCode::Enter);
        fill_page(&mut state, &["1 Main St", "Springfield", "12345"]);
        handle_key(&mut state, KeyCode::Enter);
        fill_page(&mut state, &["jdoe", "secret1", "secret1"]);
        press(&mut state, &[KeyCode::Enter, KeyCode::Enter]);
        assert!(state.wizard.is_submitted());
        assert_eq!(state.focus, FocusTarget::Button(ButtonFocus::Next));

        // Cancel asks before quitting and keeps the submitted page.
        press(&mut state, &[KeyCode::Tab, KeyCode::Enter]);
        assert_eq!(state.modal, Some(Modal::ConfirmCancel));
        assert!(state.wizard.is_submitted());
        assert!(!state.quit);
        handle_key(&mut state, KeyCode::Esc);
        assert!(state.modal.is_none());

        // Previous is disabled here.
        set_focused_button(&mut state, ButtonFocus::Back);
        handle_key(&mut state, KeyCode::Enter);
        assert!(state.wizard.is_submitted());
        assert_eq!(sink.records().len(), 1);

        // Only "Submit Another Form" restarts.
        set_focused_button(&mut state, ButtonFocus::Next);
        handle_key(&mut state, KeyCode::Enter);
        assert_eq!(state.wizard.current_step(), Some(Step::PersonalInfo));

        // Confirming cancel from the submitted page quits.
        let (mut state, _) = ui();
        fill_page(&mut state, &["Jane Doe", "jane@example.com", "5551234567"]);
        handle_key(&mut state, KeyCode::Enter);
        fill_page(&mut state, &["1 Main St", "Springfield", "12345"]);
        handle_key(&mut state, KeyCode::Enter);
        fill_page(&mut state, &["jdoe", "secret1", "secret1"]);
        press(&mut state, &[KeyCode::Enter, KeyCode::Enter]);
        set_focused_button(&mut state, ButtonFocus::Cancel);
        press(&mut state, &[KeyCode::Enter, KeyCode::Tab, KeyCode::Enter]);
        assert!(state.quit);
        assert!(state.wizard.is_submitted());
    }

    #[test]
    fn previous_button_goes_back_without_validation() {
        let (mut state, _) = ui();
        fill_page(&mut state, &["Jane Doe", "jane@example.com", "5551234567"]);
        handle_key(&mut state, KeyCode::Enter);
        handle_key(&mut state, KeyCode::Enter);
        assert!(render(&state).contains("Street address is required"));

        set_focused_button(&mut state, ButtonFocus::Back);
        handle_key(&mut state, KeyCode::Enter);
        assert_eq!(state.wizard.current_step(), Some(Step::PersonalInfo));
        assert!(render(&state).contains("Jane Doe"));
    }

    #[test]
    fn previous_on_first_page_does_nothing() {
        let (mut state, _) = ui();
        set_focused_button(&mut state, ButtonFocus::Back);
        handle_key(&mut state, KeyCode::Enter);
        assert_eq!(state.wizard.current_step(), Some(Step::PersonalInfo));
    }

    #[test]
    fn tab_cycles_fields_then_buttons() {
        let (mut state, _) = ui();
        press(&mut state, &[KeyCode::Tab, KeyCode::Tab]);
        assert_eq!(state.focus, FocusTarget::Field(2));
        press(&mut state, &[KeyCode::Tab]);
        assert_eq!(state.focus, FocusTarget::Button(ButtonFocus::Back));
        press(&mut state, &[KeyCode::Tab, KeyCode::Tab, KeyCode::Tab]);
        assert_eq!(state.focus, FocusTarget::Field(0));
        press(&mut state, &[KeyCode::BackTab]);
        assert_eq!(state.focus, FocusTarget::Button(ButtonFocus::Cancel));
    }

    #[test]
    fn escape_asks_before_quitting() {
        let (mut state, _) = ui();
        handle_key(&mut state, KeyCode::Esc);
        assert_eq!(state.modal, Some(Modal::ConfirmCancel));
        assert!(render(&state).contains("Cancel Registration?"));

        handle_key(&mut state, KeyCode::Enter);
        assert!(state.modal.is_none());
        assert!(!state.quit);

        press(&mut state, &[KeyCode::Esc, KeyCode::Tab, KeyCode::Enter]);
        assert!(state.quit);
    }

    #[test]
    fn theme_and_password_toggles() {
        let (mut state, _) = ui();
        assert_eq!(state.theme.mode(), ThemeMode::Light);
        handle_key(&mut state, KeyCode::F(2));
        assert_eq!(state.theme.mode(), ThemeMode::Dark);
        assert!(render(&state).contains("F2: light mode"));

        fill_page(&mut state, &["Jane Doe", "jane@example.com", "5551234567"]);
        handle_key(&mut state, KeyCode::Enter);
        fill_page(&mut state, &["1 Main St", "Springfield", "12345"]);
        handle_key(&mut state, KeyCode::Enter);
        fill_page(&mut state, &["jdoe", "secret1", "secret1"]);
        handle_key(&mut state, KeyCode::F(3));
        assert!(render(&state).contains("secret1"));
    }

    #[test]
    fn smoke_renders_every_page() {
        for target in ["personal", "address", "account", "summary", "submitted", "bogus"] {
            smoke(theme(), target).unwrap();
        }
    }

    #[test]
    fn smoke_pages_show_expected_content() {
        let personal = new_smoke_ui_state("personal", theme()).unwrap();
        let screen = render(&personal);
        assert!(screen.contains("Please enter a valid email address"));
        assert!(screen.contains("Phone number is required"));

        for (target, step) in [
            ("personal", Step::PersonalInfo),
            ("address", Step::Address),
            ("account", Step::Account),
            ("bogus", Step::PersonalInfo),
        ] {
            let state = new_smoke_ui_state(target, theme()).unwrap();
            assert_eq!(state.wizard.current_step(), Some(step), "target {}", target);
        }

        let summary = new_smoke_ui_state("summary", theme()).unwrap();
        assert_eq!(summary.wizard.current_step(), Some(Step::Summary));
        assert!(render(&summary).contains("ada_l"));

        let submitted = new_smoke_ui_state("submitted", theme()).unwrap();
        assert!(submitted.wizard.is_submitted());
        assert!(render(&submitted).contains("Form Submitted Successfully!"));
    }
}
