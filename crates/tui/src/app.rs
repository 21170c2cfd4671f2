use std::{cmp, io, thread, time::Duration};

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use portal_core::{
    banner::BannerView, CtaStyle, IconRef, MenuAnchor, Navigator, ProfileMenuItem, Route,
    ShellController, ShellEvent,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::theme::Theme;

const TICK_RATE: Duration = Duration::from_millis(250);
const MAX_PATH_LEN: usize = 128;
const PROFILE_ANCHOR: &str = "header.profile";
const BRAND: &str = "Bloom Insurance";
const COPYRIGHT: &str = "© 2026 Insurance Portal. All rights reserved.";

enum AppEvent {
    Input(Event),
    Tick,
}

/// Navigator that hands requested paths back to the event loop.
pub struct ChannelNavigator {
    sender: mpsc::UnboundedSender<String>,
}

impl ChannelNavigator {
    pub fn new(sender: mpsc::UnboundedSender<String>) -> Self {
        Self { sender }
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, path: &str) {
        if self.sender.send(path.to_string()).is_err() {
            warn!(path, "router closed; navigation dropped");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Page,
    Cta(usize),
}

#[derive(Debug, Clone)]
struct PathPrompt {
    input: String,
    cursor: usize,
}

impl PathPrompt {
    fn new(initial: &str) -> Self {
        let input: String = initial.chars().filter(|ch| ch.is_ascii()).collect();
        Self {
            cursor: input.len(),
            input,
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.input.len() as isize;
        self.cursor = (self.cursor as isize + delta).clamp(0, len) as usize;
    }

    fn insert(&mut self, ch: char) {
        if self.input.len() >= MAX_PATH_LEN {
            return;
        }
        if ch.is_ascii() && !ch.is_ascii_control() && ch != ' ' {
            self.input.insert(self.cursor, ch);
            self.cursor += 1;
        }
    }

    fn backspace(&mut self) {
        if self.cursor > 0 && self.cursor <= self.input.len() {
            self.cursor -= 1;
            self.input.remove(self.cursor);
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.input.len() {
            self.input.remove(self.cursor);
        }
    }

    fn value(&self) -> Option<String> {
        let trimmed = self.input.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

/// Terminal rendering surface for the portal shell.
pub struct PortalApp {
    shell: ShellController,
    routes: mpsc::UnboundedReceiver<String>,
    theme: Theme,
    focus: Focus,
    menu_cursor: usize,
    path_prompt: Option<PathPrompt>,
    status: String,
    should_quit: bool,
}

impl PortalApp {
    pub fn new(
        shell: ShellController,
        routes: mpsc::UnboundedReceiver<String>,
        theme: Theme,
    ) -> Self {
        Self {
            shell,
            routes,
            theme,
            focus: Focus::Page,
            menu_cursor: 0,
            path_prompt: None,
            status: "Ready".to_string(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        info!(path = %self.shell.current_path(), "portal shell starting");
        self.set_status(match self.shell.current_route() {
            Some(route) => format!("Viewing {}", route.title()),
            None => format!("No page at {}", self.shell.current_path()),
        });

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let result = self.event_loop(&mut terminal).await;
        restore_terminal(&mut terminal)?;
        info!("portal shell stopped");
        result
    }

    async fn event_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.should_quit {
                break;
            }
            match event_rx.recv().await {
                Some(AppEvent::Input(event)) => self.handle_input(event),
                Some(AppEvent::Tick) => {}
                None => break,
            }
        }
        Ok(())
    }

    fn handle_input(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                self.handle_key(key);
            }
        }
    }

    /// Apply route changes queued by the navigator, in request order.
    fn process_pending_routes(&mut self) {
        while let Ok(path) = self.routes.try_recv() {
            self.shell.route_changed(path);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if self.path_prompt.is_some() {
            self.handle_prompt_key(key);
        } else if self.shell.is_contact_preferences_open() {
            self.handle_dialog_key(key);
        } else if self.shell.is_profile_menu_open() {
            self.handle_menu_key(key);
        } else {
            self.handle_shell_key(key);
        }
        self.process_pending_routes();
        self.collect_events();
    }

    fn handle_shell_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(ch @ '1'..='9') => {
                let index = ch as usize - '1' as usize;
                if !self.shell.navigate_to_destination(index) {
                    debug!(index, "no destination at index");
                }
            }
            KeyCode::Char('h') => self.shell.navigate_home(),
            KeyCode::Tab => self.cycle_focus(1),
            KeyCode::BackTab => self.cycle_focus(-1),
            KeyCode::Enter => {
                if let Focus::Cta(index) = self.focus {
                    self.shell.activate_cta(index);
                }
            }
            KeyCode::Char('x') => self.shell.dismiss_banner(),
            KeyCode::Char('p') => {
                self.menu_cursor = 0;
                self.shell.open_profile_menu(MenuAnchor::new(PROFILE_ANCHOR));
            }
            KeyCode::Char('g') => {
                self.path_prompt = Some(PathPrompt::new(self.shell.current_path()));
            }
            _ => {}
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        let items = ProfileMenuItem::ALL;
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.menu_cursor = cmp::min(self.menu_cursor + 1, items.len() - 1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.menu_cursor = self.menu_cursor.saturating_sub(1);
            }
            KeyCode::Enter => {
                if let Some(item) = items.get(self.menu_cursor) {
                    self.shell.select_menu_item(*item);
                }
            }
            KeyCode::Esc | KeyCode::Char('p') | KeyCode::Char('q') => {
                self.shell.close_profile_menu()
            }
            _ => {}
        }
    }

    fn handle_dialog_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
            self.shell.close_contact_preferences();
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Some(prompt) = self.path_prompt.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.path_prompt = None;
                self.set_status("Navigation cancelled".to_string());
            }
            KeyCode::Enter => {
                let target = prompt.value();
                self.path_prompt = None;
                if let Some(path) = target {
                    self.shell.navigate(&path);
                }
            }
            KeyCode::Left => prompt.move_cursor(-1),
            KeyCode::Right => prompt.move_cursor(1),
            KeyCode::Home => prompt.cursor = 0,
            KeyCode::End => prompt.cursor = prompt.input.len(),
            KeyCode::Backspace => prompt.backspace(),
            KeyCode::Delete => prompt.delete(),
            KeyCode::Char(ch) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    prompt.insert(ch);
                }
            }
            _ => {}
        }
    }

    fn cycle_focus(&mut self, delta: isize) {
        let count = self
            .shell
            .banner_view()
            .map(|view| view.cta_buttons.len())
            .unwrap_or(0);
        if count == 0 {
            self.focus = Focus::Page;
            return;
        }
        // Positions: 0 = page, 1..=count = CTAs.
        let slots = count as isize + 1;
        let current = match self.focus {
            Focus::Page => 0,
            Focus::Cta(index) => index as isize + 1,
        };
        let next = (current + delta).rem_euclid(slots);
        self.focus = if next == 0 {
            Focus::Page
        } else {
            Focus::Cta(next as usize - 1)
        };
    }

    fn collect_events(&mut self) {
        for event in self.shell.drain_events() {
            debug!(?event, "shell event");
            let message = match event {
                ShellEvent::MenuOpened(_) => Some("Profile menu".to_string()),
                ShellEvent::MenuClosed => None,
                ShellEvent::DialogOpened => Some(format!(
                    "Contact preferences for {}",
                    self.shell.contact_preferences_props().user_email
                )),
                ShellEvent::DialogClosed => Some("Contact preferences closed".to_string()),
                ShellEvent::BannerDismissed { .. } => Some("Announcement dismissed".to_string()),
                ShellEvent::NavigationRequested(path) => Some(format!("Opening {path}")),
                ShellEvent::RouteChanged(path) => Some(match Route::resolve(&path) {
                    Some(route) => format!("Viewing {}", route.title()),
                    None => format!("No page at {path}"),
                }),
                ShellEvent::ExternalOpened { url, launched } => {
                    launched.then(|| format!("Opened {url} in your browser"))
                }
            };
            if let Some(message) = message {
                self.set_status(message);
            }
        }
        if self.shell.banner_view().is_none() {
            self.focus = Focus::Page;
        }
    }

    fn set_status(&mut self, message: String) {
        self.status = format!("{}  {message}", Local::now().format("%H:%M:%S"));
    }

    fn draw(&self, frame: &mut Frame) {
        let area = frame.size();
        let banner = self.shell.banner_view();
        let banner_height = if banner.is_some() { 3 } else { 0 };
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(banner_height),
                Constraint::Min(3),
                Constraint::Length(2),
            ])
            .split(area);

        self.render_header(frame, layout[0]);
        if let Some(view) = banner {
            self.render_banner(frame, layout[1], view);
        }
        self.render_page(frame, layout[2]);
        self.render_footer(frame, layout[3]);

        if self.shell.is_profile_menu_open() {
            self.render_profile_menu(frame, layout[0]);
        }
        if self.shell.is_contact_preferences_open() {
            self.render_contact_preferences(frame);
        }
        if let Some(prompt) = &self.path_prompt {
            self.render_path_prompt(frame, prompt);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(
                format!("✿ {BRAND}"),
                Style::default()
                    .fg(self.theme.muted)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
        ];
        for (index, item) in self.shell.nav_items().into_iter().enumerate() {
            let style = if item.active {
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(self.theme.primary_fg)
            };
            spans.push(Span::styled(
                format!(
                    " {} {} {} ",
                    index + 1,
                    icon_glyph(item.destination.icon),
                    item.destination.label
                ),
                style,
            ));
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(
            format!("  [p] {}", icon_glyph(IconRef::Person)),
            Style::default().fg(self.theme.accent),
        ));

        let header = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::BOTTOM))
            .alignment(Alignment::Left);
        frame.render_widget(header, area);
    }

    fn render_banner(&self, frame: &mut Frame, area: Rect, view: BannerView<'_>) {
        let base = Style::default()
            .bg(self.theme.banner_bg)
            .fg(self.theme.banner_fg);
        let mut cta_spans = Vec::new();
        for (index, button) in view.cta_buttons.iter().enumerate() {
            let icon = button.icon.map(icon_glyph).unwrap_or("");
            let text = match button.style {
                CtaStyle::Text => format!(" {icon} {} ", button.label),
                CtaStyle::Outlined | CtaStyle::Filled => format!("[ {icon} {} ]", button.label),
            };
            let mut style = base;
            if button.style == CtaStyle::Filled {
                style = style.add_modifier(Modifier::BOLD);
            }
            if self.focus == Focus::Cta(index) {
                style = style.add_modifier(Modifier::REVERSED);
            }
            cta_spans.push(Span::styled(text, style));
            cta_spans.push(Span::styled("  ", base));
        }
        if view.dismissible {
            cta_spans.push(Span::styled(
                format!("{} dismiss (x)", icon_glyph(IconRef::Close)),
                base.add_modifier(Modifier::DIM),
            ));
        }
        let lines = vec![
            Line::from(Span::styled(
                view.message.to_string(),
                base.add_modifier(Modifier::BOLD),
            )),
            Line::from(cta_spans),
            Line::from(Span::styled("Tab to focus, Enter to open", base)),
        ];
        let paragraph = Paragraph::new(lines)
            .style(base)
            .alignment(Alignment::Left);
        frame.render_widget(paragraph, area);
    }

    fn render_page(&self, frame: &mut Frame, area: Rect) {
        // Unmatched routes render an empty content area.
        let Some(route) = self.shell.current_route() else {
            return;
        };
        let body = match &route {
            Route::Dashboard => "Welcome back. Your policies and coverage at a glance.".to_string(),
            Route::PolicyDetails { id } => format!("Policy {id}"),
            Route::Actions => "Outstanding actions across your policies.".to_string(),
            Route::CoverageCalculator => {
                "Estimate the coverage your household needs.".to_string()
            }
            Route::IllustrationDetails { id } => format!("Illustration {id}"),
        };
        let paragraph = Paragraph::new(vec![
            Line::from(Span::styled(
                route.path(),
                Style::default().fg(self.theme.muted),
            )),
            Line::from(""),
            Line::from(body),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(route.title()),
        )
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(area);
        let status_style = if self.shell.current_route().is_none() {
            Style::default().fg(self.theme.danger)
        } else {
            Style::default().fg(self.theme.primary_fg)
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(self.status.clone(), status_style))),
            rows[0],
        );
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                COPYRIGHT,
                Style::default().fg(self.theme.muted),
            )))
            .alignment(Alignment::Center),
            rows[1],
        );
    }

    fn render_profile_menu(&self, frame: &mut Frame, header: Rect) {
        let frame_area = frame.size();
        let items = ProfileMenuItem::ALL;
        let width = 28_u16.min(frame_area.width);
        let height = (items.len() as u16 + 2).min(frame_area.height.saturating_sub(header.bottom()));
        let x = header.right().saturating_sub(width);
        let area = Rect::new(x, header.bottom(), width, height);

        frame.render_widget(Clear, area);
        let list_items: Vec<ListItem> = items
            .iter()
            .map(|item| ListItem::new(format!("{} {}", icon_glyph(item.icon()), item.label())))
            .collect();
        let list = List::new(list_items)
            .block(Block::default().borders(Borders::ALL).title("Profile"))
            .highlight_style(
                Style::default()
                    .bg(self.theme.selection_bg)
                    .fg(self.theme.selection_fg)
                    .add_modifier(Modifier::BOLD),
            );
        let mut state = ListState::default();
        state.select(Some(self.menu_cursor));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn render_contact_preferences(&self, frame: &mut Frame) {
        let props = self.shell.contact_preferences_props();
        let area = centered_rect(56, 8, frame.size());
        frame.render_widget(Clear, area);
        let lines = vec![
            Line::from("Choose how Bloom Insurance keeps in touch."),
            Line::from(""),
            Line::from(vec![
                Span::styled("Email  ", Style::default().fg(self.theme.muted)),
                Span::styled(props.user_email, Style::default().add_modifier(Modifier::BOLD)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" close"),
            ]),
        ];
        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("{} Contact Preferences", icon_glyph(IconRef::ContactPhone))),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_path_prompt(&self, frame: &mut Frame, prompt: &PathPrompt) {
        let frame_area = frame.size();
        let width = cmp::max(cmp::min(60_u16, frame_area.width.saturating_sub(4)), 24_u16);
        let area = centered_rect(width, 6, frame_area);

        frame.render_widget(Clear, area);
        let input_line = Line::from(vec![
            Span::styled("> ", Style::default().fg(self.theme.accent)),
            Span::raw(prompt.input.clone()),
        ]);
        let helper = Line::from(vec![
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" go  "),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" cancel"),
        ]);
        let paragraph = Paragraph::new(vec![input_line, Line::from(""), helper])
            .block(Block::default().borders(Borders::ALL).title("Go to path"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);

        let cursor_x =
            (area.x + 3 + prompt.cursor as u16).min(area.x + area.width.saturating_sub(2));
        frame.set_cursor(cursor_x, area.y + 1);
    }
}

fn icon_glyph(icon: IconRef) -> &'static str {
    match icon {
        IconRef::Dashboard => "▦",
        IconRef::Assignment => "✎",
        IconRef::Calculate => "±",
        IconRef::Person => "☺",
        IconRef::ContactPhone => "☎",
        IconRef::Description => "▤",
        IconRef::PlayCircle => "▶",
        IconRef::Close => "✕",
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}
