//! Character creation TUI wizard.
//!
//! One screen per [`WizardStep`] on the left and a live preview of the build
//! on the right. All rules live in `cosmere-core`; this module only turns
//! keys into draft edits and draws the result.

use cosmere_core::catalog::CatalogEntry;
use cosmere_core::selection::MAX_CULTURES;
use cosmere_core::snapshot::PLACEHOLDER;
use cosmere_core::{Attribute, BuildSnapshot, Wizard, WizardStep, ATTRIBUTE_POOL, SKILL_POOL};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap};

const MAX_NAME_LEN: usize = 40;

/// Severity of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Warning,
    Error,
}

/// A row on the paths screen: heroic paths are listed first, then radiant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathRow {
    Heroic(usize),
    Radiant(usize),
}

/// Character creation state.
pub struct Creator {
    pub wizard: Wizard,
    pub list_state: ListState,
    pub cursor_position: usize,
    pub status: Option<(String, StatusKind)>,
    /// Set when the player confirms on the review screen; the caller saves.
    pub submit_requested: bool,
    pub finished: bool,
    pub cancelled: bool,
}

impl Creator {
    pub fn new(wizard: Wizard) -> Self {
        let cursor_position = wizard.selection.name().chars().count();
        let mut creator = Self {
            wizard,
            list_state: ListState::default(),
            cursor_position,
            status: None,
            submit_requested: false,
            finished: false,
            cancelled: false,
        };
        creator.reset_list();
        creator
    }

    pub fn step(&self) -> WizardStep {
        self.wizard.step()
    }

    pub fn set_status(&mut self, message: impl Into<String>, kind: StatusKind) {
        self.status = Some((message.into(), kind));
    }

    /// Number of selectable rows on the current step.
    fn row_count(&self) -> usize {
        let catalogs = &self.wizard.catalogs;
        match self.step() {
            WizardStep::Name | WizardStep::Review => 0,
            WizardStep::Ancestry => catalogs.ancestries.len(),
            WizardStep::Culture => catalogs.cultures.len(),
            WizardStep::Paths => catalogs.heroic_paths.len() + catalogs.radiant_paths.len(),
            WizardStep::Attributes => Attribute::all().len(),
            WizardStep::Skills => self.wizard.selection.skills().len(),
            WizardStep::Expertise => self.wizard.selection.expertise().len(),
            WizardStep::Items => catalogs.items.len(),
        }
    }

    fn selected(&self) -> Option<usize> {
        self.list_state.selected().filter(|i| *i < self.row_count())
    }

    fn reset_list(&mut self) {
        let first = (self.row_count() > 0).then_some(0);
        self.list_state.select(first);
    }

    fn advance_step(&mut self) {
        let before = self.step();
        if self.wizard.next_step() != before {
            self.reset_list();
        }
    }

    fn retreat_step(&mut self) {
        let before = self.step();
        if self.wizard.prev_step() != before {
            self.reset_list();
        }
    }

    fn move_selection(&mut self, down: bool) {
        let max = self.row_count();
        if max == 0 {
            return;
        }
        let i = self.list_state.selected().unwrap_or(0).min(max - 1);
        let next = if down {
            (i + 1) % max
        } else if i == 0 {
            max - 1
        } else {
            i - 1
        };
        self.list_state.select(Some(next));
    }

    /// Handle keyboard input.
    pub fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.cancelled = true;
            return;
        }

        match key.code {
            KeyCode::Tab => {
                self.advance_step();
                return;
            }
            KeyCode::BackTab => {
                self.retreat_step();
                return;
            }
            KeyCode::Esc => {
                if self.step() == WizardStep::Name {
                    self.cancelled = true;
                } else {
                    self.retreat_step();
                }
                return;
            }
            _ => {}
        }

        match self.step() {
            WizardStep::Name => self.handle_name_input(key),
            WizardStep::Ancestry => self.handle_ancestry(key),
            WizardStep::Culture => self.handle_culture(key),
            WizardStep::Paths => self.handle_paths(key),
            WizardStep::Attributes => self.handle_points(key, true),
            WizardStep::Skills => self.handle_points(key, false),
            WizardStep::Expertise => self.handle_expertise(key),
            WizardStep::Items => self.handle_items(key),
            WizardStep::Review => self.handle_review(key),
        }
    }

    fn handle_name_input(&mut self, key: KeyEvent) {
        let mut name: Vec<char> = self.wizard.selection.name().chars().collect();
        self.cursor_position = self.cursor_position.min(name.len());

        match key.code {
            KeyCode::Char(c) => {
                if name.len() < MAX_NAME_LEN {
                    name.insert(self.cursor_position, c);
                    self.cursor_position += 1;
                }
            }
            KeyCode::Backspace => {
                if self.cursor_position > 0 {
                    self.cursor_position -= 1;
                    name.remove(self.cursor_position);
                }
            }
            KeyCode::Delete => {
                if self.cursor_position < name.len() {
                    name.remove(self.cursor_position);
                }
            }
            KeyCode::Left => {
                self.cursor_position = self.cursor_position.saturating_sub(1);
            }
            KeyCode::Right => {
                self.cursor_position = (self.cursor_position + 1).min(name.len());
            }
            KeyCode::Enter => {
                self.advance_step();
                return;
            }
            _ => return,
        }
        self.wizard.selection.set_name(name.into_iter().collect::<String>());
    }

    /// Shared up/down handling. Returns `true` if the key was consumed.
    fn handle_navigation(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(false),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(true),
            _ => return false,
        }
        true
    }

    fn handle_ancestry(&mut self, key: KeyEvent) {
        if self.handle_navigation(key) {
            return;
        }
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(i) = self.selected() {
                    let entry = self.wizard.catalogs.ancestries[i].clone();
                    self.wizard.selection.set_ancestry(Some(entry));
                }
                if key.code == KeyCode::Enter {
                    self.advance_step();
                }
            }
            KeyCode::Char('x') | KeyCode::Delete => self.wizard.selection.set_ancestry(None),
            _ => {}
        }
    }

    fn handle_culture(&mut self, key: KeyEvent) {
        if self.handle_navigation(key) {
            return;
        }
        match key.code {
            KeyCode::Char(' ') => {
                if let Some(i) = self.selected() {
                    let entry = self.wizard.catalogs.cultures[i].clone();
                    let name = entry.name.clone();
                    if self.wizard.selection.toggle_culture(entry) {
                        self.status = None;
                    } else {
                        self.set_status(
                            format!("Cannot add {name}: at most {MAX_CULTURES} cultures"),
                            StatusKind::Warning,
                        );
                    }
                }
            }
            KeyCode::Enter => self.advance_step(),
            _ => {}
        }
    }

    fn path_row(&self, i: usize) -> Option<PathRow> {
        let heroic = self.wizard.catalogs.heroic_paths.len();
        let radiant = self.wizard.catalogs.radiant_paths.len();
        if i < heroic {
            Some(PathRow::Heroic(i))
        } else if i - heroic < radiant {
            Some(PathRow::Radiant(i - heroic))
        } else {
            None
        }
    }

    fn handle_paths(&mut self, key: KeyEvent) {
        if self.handle_navigation(key) {
            return;
        }
        if !matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
            return;
        }
        let Some(row) = self.selected().and_then(|i| self.path_row(i)) else {
            return;
        };

        // Choosing the selected path again clears it
        let selection = &mut self.wizard.selection;
        match row {
            PathRow::Heroic(i) => {
                let entry = &self.wizard.catalogs.heroic_paths[i];
                let same = selection.heroic_path().is_some_and(|p| p.id == entry.id);
                selection.set_heroic_path((!same).then(|| entry.clone()));
            }
            PathRow::Radiant(i) => {
                let entry = &self.wizard.catalogs.radiant_paths[i];
                let same = selection.radiant_path().is_some_and(|p| p.id == entry.id);
                selection.set_radiant_path((!same).then(|| entry.clone()));
            }
        }
    }

    fn handle_points(&mut self, key: KeyEvent, attributes: bool) {
        if self.handle_navigation(key) {
            return;
        }
        let delta = match key.code {
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('+') | KeyCode::Char('=') => 1,
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('-') => -1,
            KeyCode::Enter => {
                self.advance_step();
                return;
            }
            _ => return,
        };
        let Some(i) = self.selected() else {
            return;
        };

        let selection = &mut self.wizard.selection;
        if attributes {
            let attribute = Attribute::all()[i];
            let current = i32::from(selection.attributes().get(attribute));
            selection.set_attribute(attribute, current + delta);
        } else {
            let name = selection.skills().ranks()[i].name.clone();
            let current = i32::from(selection.skills().ranks()[i].value);
            selection.set_skill(&name, current + delta);
        }
    }

    fn handle_expertise(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.move_selection(false),
            KeyCode::Down => self.move_selection(true),
            KeyCode::Enter => self.advance_step(),
            KeyCode::Char(c) => {
                if let Some(i) = self.selected() {
                    let mut text = self.wizard.selection.expertise().slots()[i].clone();
                    text.push(c);
                    self.wizard.selection.set_expertise(i, text);
                }
            }
            KeyCode::Backspace => {
                if let Some(i) = self.selected() {
                    let mut text = self.wizard.selection.expertise().slots()[i].clone();
                    text.pop();
                    self.wizard.selection.set_expertise(i, text);
                }
            }
            _ => {}
        }
    }

    fn handle_items(&mut self, key: KeyEvent) {
        if self.handle_navigation(key) {
            return;
        }
        match key.code {
            KeyCode::Char(' ') => {
                if let Some(i) = self.selected() {
                    let entry = self.wizard.catalogs.items[i].clone();
                    self.wizard.selection.toggle_item(entry);
                }
            }
            KeyCode::Enter => self.advance_step(),
            _ => {}
        }
    }

    fn handle_review(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => self.submit_requested = true,
            KeyCode::Char('n') | KeyCode::Char('N') => self.retreat_step(),
            KeyCode::Char('q') | KeyCode::Char('Q') => self.finished = true,
            _ => {}
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Clear, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);
        self.render_status(frame, rows[1]);

        let snapshot = self.wizard.snapshot();

        if self.step() == WizardStep::Review {
            self.render_review(frame, rows[0], &snapshot);
            return;
        }

        // Two-column layout: left for the current step, right for preview
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(rows[0]);

        let left_block = Block::default()
            .title(format!(" {} ", self.step().title()))
            .title_bottom(Line::from(format!(" {} ", self.step().indicator())).right_aligned())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let left_inner = left_block.inner(columns[0]);
        frame.render_widget(left_block, columns[0]);

        match self.step() {
            WizardStep::Name => self.render_name_input(frame, left_inner),
            WizardStep::Ancestry => self.render_ancestry(frame, left_inner),
            WizardStep::Culture => self.render_cultures(frame, left_inner),
            WizardStep::Paths => self.render_paths(frame, left_inner),
            WizardStep::Attributes => self.render_attributes(frame, left_inner),
            WizardStep::Skills => self.render_skills(frame, left_inner),
            WizardStep::Expertise => self.render_expertise(frame, left_inner),
            WizardStep::Items => self.render_items(frame, left_inner),
            WizardStep::Review => {} // Handled above
        }

        render_preview(frame, columns[1], &snapshot);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let line = match &self.status {
            Some((message, kind)) => {
                let color = match kind {
                    StatusKind::Info => Color::Green,
                    StatusKind::Warning => Color::Yellow,
                    StatusKind::Error => Color::Red,
                };
                Line::from(Span::styled(message.clone(), Style::default().fg(color)))
            }
            None => Line::from(Span::styled(
                "Tab/Shift-Tab: next/previous step  Esc: back  Ctrl-C: quit",
                Style::default().fg(Color::DarkGray),
            )),
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_name_input(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(area);

        let prompt = Paragraph::new("What is your hero's name?")
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(prompt, chunks[0]);

        let chars: Vec<char> = self.wizard.selection.name().chars().collect();
        let split = self.cursor_position.min(chars.len());
        let before: String = chars[..split].iter().collect();
        let after: String = chars[split..].iter().collect();
        let input = Paragraph::new(format!("{before}█{after}"))
            .block(Block::default().borders(Borders::ALL).title(" Name "))
            .style(Style::default().fg(Color::White));
        frame.render_widget(input, chunks[1]);

        let help = Paragraph::new("Press Enter to continue, Esc to cancel. A blank name uses the default.")
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true });
        frame.render_widget(help, chunks[2]);
    }

    fn render_entry_list(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        header: String,
        items: Vec<ListItem<'static>>,
        title: &str,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(area);

        let header = Paragraph::new(header)
            .style(Style::default().fg(Color::Yellow))
            .wrap(Wrap { trim: true });
        frame.render_widget(header, chunks[0]);

        if items.is_empty() {
            let empty = Paragraph::new("Nothing to choose from. Check the catalog settings.")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL).title(format!(" {title} ")));
            frame.render_widget(empty, chunks[1]);
            return;
        }

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(format!(" {title} ")))
            .highlight_style(Style::default().bg(Color::Blue))
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, chunks[1], &mut self.list_state);
    }

    fn render_ancestry(&mut self, frame: &mut Frame, area: Rect) {
        let chosen = self.wizard.selection.ancestry().map(|a| a.id.clone());
        let items = marked_items(&self.wizard.catalogs.ancestries, |e| {
            chosen.as_deref() == Some(e.id.as_str())
        });
        self.render_entry_list(
            frame,
            area,
            "Enter to choose and continue, Space to choose, x to clear".to_string(),
            items,
            "Ancestries",
        );
    }

    fn render_cultures(&mut self, frame: &mut Frame, area: Rect) {
        let selection = &self.wizard.selection;
        let items = marked_items(&self.wizard.catalogs.cultures, |e| selection.has_culture(&e.id));
        let header = format!(
            "Choose up to {MAX_CULTURES} cultures (Space to toggle, Enter when done) - {}/{MAX_CULTURES} selected",
            selection.cultures().len()
        );
        self.render_entry_list(frame, area, header, items, "Cultures");
    }

    fn render_paths(&mut self, frame: &mut Frame, area: Rect) {
        let selection = &self.wizard.selection;
        let heroic = selection.heroic_path().map(|p| p.id.clone());
        let radiant = selection.radiant_path().map(|p| p.id.clone());

        let mut items = tagged_items(&self.wizard.catalogs.heroic_paths, "heroic", |e| {
            heroic.as_deref() == Some(e.id.as_str())
        });
        items.extend(tagged_items(&self.wizard.catalogs.radiant_paths, "radiant", |e| {
            radiant.as_deref() == Some(e.id.as_str())
        }));

        self.render_entry_list(
            frame,
            area,
            "One heroic and one radiant path. Enter or Space to choose, again to clear".to_string(),
            items,
            "Paths",
        );
    }

    fn render_attributes(&mut self, frame: &mut Frame, area: Rect) {
        let attributes = self.wizard.selection.attributes();
        let items: Vec<ListItem<'static>> = attributes
            .values()
            .iter()
            .map(|(attribute, value)| {
                ListItem::new(format!(
                    "{:<10} {} {}",
                    attribute.name(),
                    pips(*value, ATTRIBUTE_POOL.per_item_cap),
                    value
                ))
            })
            .collect();
        let header = format!(
            "Points remaining: {}/{}. Use ←/→ or h/l to adjust, j/k to navigate. Intellect sets expertise slots.",
            attributes.remaining(),
            ATTRIBUTE_POOL.total
        );
        self.render_entry_list(frame, area, header, items, "Attributes");
    }

    fn render_skills(&mut self, frame: &mut Frame, area: Rect) {
        let skills = self.wizard.selection.skills();
        let items: Vec<ListItem<'static>> = skills
            .ranks()
            .iter()
            .map(|rank| {
                let style = if rank.value > 0 {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::White)
                };
                ListItem::new(format!(
                    "{:<16} {} {}",
                    rank.name,
                    pips(rank.value, SKILL_POOL.per_item_cap),
                    rank.value
                ))
                .style(style)
            })
            .collect();
        let header = format!(
            "Points remaining: {}/{}. Use ←/→ or h/l to adjust, j/k to navigate.",
            skills.remaining(),
            SKILL_POOL.total
        );
        self.render_entry_list(frame, area, header, items, "Skills");
    }

    fn render_expertise(&mut self, frame: &mut Frame, area: Rect) {
        let expertise = self.wizard.selection.expertise();
        if expertise.is_empty() {
            let message = Paragraph::new(
                "No expertise slots. Raise Intellect on the attributes step to gain one per point.",
            )
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true });
            frame.render_widget(message, area);
            return;
        }

        let items: Vec<ListItem<'static>> = expertise
            .slots()
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let shown = if text.is_empty() { "(empty)" } else { text.as_str() };
                ListItem::new(format!("{}. {shown}", i + 1))
            })
            .collect();
        let header = format!(
            "{} slots from Intellect. Type to fill the selected slot, ↑/↓ to move, Enter when done.",
            expertise.len()
        );
        self.render_entry_list(frame, area, header, items, "Expertise");
    }

    fn render_items(&mut self, frame: &mut Frame, area: Rect) {
        let selection = &self.wizard.selection;
        let items = marked_items(&self.wizard.catalogs.items, |e| selection.has_item(&e.id));
        let header = format!(
            "Space to toggle, Enter when done - {} selected",
            selection.items().len()
        );
        self.render_entry_list(frame, area, header, items, "Items");
    }

    fn render_review(&self, frame: &mut Frame, area: Rect, snapshot: &BuildSnapshot) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);

        let sheet_block = Block::default()
            .title(format!(" {} ", snapshot.name))
            .title_bottom(Line::from(format!(" {} ", self.step().indicator())).right_aligned())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let sheet_inner = sheet_block.inner(columns[0]);
        frame.render_widget(sheet_block, columns[0]);
        frame.render_widget(
            Paragraph::new(sheet_lines(snapshot)).wrap(Wrap { trim: false }),
            sheet_inner,
        );

        let confirm_block = Block::default()
            .title(" Confirm ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green));
        let confirm_inner = confirm_block.inner(columns[1]);
        frame.render_widget(confirm_block, columns[1]);

        let action = if self.wizard.selection.target().is_some() {
            " - Save changes"
        } else {
            " - Create character"
        };
        let confirm_text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Ready to take the First Ideal?",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Enter", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                Span::raw(" or "),
                Span::styled("Y", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                Span::raw(action),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Esc", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                Span::raw(" or "),
                Span::styled("N", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                Span::raw(" - Go back"),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Q", Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)),
                Span::raw(" - Quit"),
            ]),
        ];
        frame.render_widget(Paragraph::new(confirm_text), confirm_inner);
    }
}

fn entry_item(name: &str, selected: bool) -> ListItem<'static> {
    let marker = if selected { "[X]" } else { "[ ]" };
    ListItem::new(format!("{marker} {name}")).style(if selected {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::White)
    })
}

fn marked_items(
    entries: &[CatalogEntry],
    is_selected: impl Fn(&CatalogEntry) -> bool,
) -> Vec<ListItem<'static>> {
    entries
        .iter()
        .map(|e| entry_item(&e.name, is_selected(e)))
        .collect()
}

fn tagged_items(
    entries: &[CatalogEntry],
    tag: &str,
    is_selected: impl Fn(&CatalogEntry) -> bool,
) -> Vec<ListItem<'static>> {
    entries
        .iter()
        .map(|e| entry_item(&format!("{} ({tag})", e.name), is_selected(e)))
        .collect()
}

fn pips(value: u8, cap: u8) -> String {
    let filled = usize::from(value.min(cap));
    let empty = usize::from(cap) - filled;
    format!("{}{}", "●".repeat(filled), "○".repeat(empty))
}

fn labelled(label: &str, value: &str) -> Line<'static> {
    let style = if value == PLACEHOLDER {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White)
    };
    Line::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(Color::DarkGray)),
        Span::styled(value.to_string(), style),
    ])
}

fn sheet_lines(snapshot: &BuildSnapshot) -> Vec<Line<'static>> {
    let mut lines = vec![
        labelled("Ancestry", &snapshot.ancestry),
        labelled("Cultures", &snapshot.cultures),
        labelled("Heroic Path", &snapshot.heroic_path),
        labelled("Radiant Path", &snapshot.radiant_path),
        Line::from(""),
        Line::from(Span::styled(
            format!("Attributes ({} left)", snapshot.attribute_points_remaining),
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    for (attribute, value) in &snapshot.attributes {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {}: ", attribute.key().to_uppercase()),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                value.to_string(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Skills ({} left)", snapshot.skill_points_remaining),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    if snapshot.skills.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("  {PLACEHOLDER}"),
            Style::default().fg(Color::DarkGray),
        )));
    }
    for skill in &snapshot.skills {
        lines.push(Line::from(format!("  {} {}", skill.name, skill.value)));
    }

    if !snapshot.expertise.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Expertise",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for text in &snapshot.expertise {
            lines.push(Line::from(format!("  {text}")));
        }
    }

    if !snapshot.items.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Items",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for item in &snapshot.items {
            lines.push(Line::from(format!("  {item}")));
        }
    }
    lines
}

/// Render the build preview panel.
fn render_preview(frame: &mut Frame, area: Rect, snapshot: &BuildSnapshot) {
    let block = Block::default()
        .title(format!(" {} ", snapshot.name))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Attribute budget
            Constraint::Length(1), // Skill budget
            Constraint::Min(0),    // Sheet
        ])
        .split(inner);

    let spent = |remaining: u8, total: u8| f64::from(total - remaining.min(total)) / f64::from(total.max(1));

    let attribute_gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(spent(snapshot.attribute_points_remaining, ATTRIBUTE_POOL.total))
        .label(format!("Attributes: {} left", snapshot.attribute_points_remaining));
    frame.render_widget(attribute_gauge, chunks[0]);

    let skill_gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(spent(snapshot.skill_points_remaining, SKILL_POOL.total))
        .label(format!("Skills: {} left", snapshot.skill_points_remaining));
    frame.render_widget(skill_gauge, chunks[1]);

    frame.render_widget(
        Paragraph::new(sheet_lines(snapshot)).wrap(Wrap { trim: false }),
        chunks[2],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmere_core::catalog::CatalogSet;
    use cosmere_core::testing::{sample_catalog, sample_settings};

    async fn sample_creator() -> Creator {
        let catalogs = CatalogSet::load(&sample_catalog(), &sample_settings()).await;
        Creator::new(Wizard::new(catalogs, sample_settings()))
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn press(creator: &mut Creator, codes: &[KeyCode]) {
        for code in codes {
            creator.handle_event(key(*code));
        }
    }

    fn type_text(creator: &mut Creator, text: &str) {
        for c in text.chars() {
            creator.handle_event(key(KeyCode::Char(c)));
        }
    }

    #[tokio::test]
    async fn test_name_editing() {
        let mut creator = sample_creator().await;
        // Clear the default name first
        for _ in 0..creator.wizard.selection.name().chars().count() {
            press(&mut creator, &[KeyCode::Backspace]);
        }
        type_text(&mut creator, "Kaladn");
        press(&mut creator, &[KeyCode::Left]);
        type_text(&mut creator, "i");
        assert_eq!(creator.wizard.selection.name(), "Kaladin");

        press(&mut creator, &[KeyCode::Enter]);
        assert_eq!(creator.step(), WizardStep::Ancestry);
    }

    #[tokio::test]
    async fn test_escape_on_first_step_cancels() {
        let mut creator = sample_creator().await;
        press(&mut creator, &[KeyCode::Esc]);
        assert!(creator.cancelled);
    }

    #[tokio::test]
    async fn test_choose_ancestry_and_advance() {
        let mut creator = sample_creator().await;
        creator.wizard.go_to(WizardStep::Ancestry);
        creator.reset_list();
        press(&mut creator, &[KeyCode::Down, KeyCode::Enter]);
        assert_eq!(creator.wizard.selection.ancestry().map(|a| a.id.as_str()), Some("singer"));
        assert_eq!(creator.step(), WizardStep::Culture);
    }

    #[tokio::test]
    async fn test_third_culture_warns() {
        let mut creator = sample_creator().await;
        creator.wizard.go_to(WizardStep::Culture);
        creator.reset_list();
        press(
            &mut creator,
            &[
                KeyCode::Char(' '),
                KeyCode::Down,
                KeyCode::Char(' '),
                KeyCode::Down,
                KeyCode::Char(' '),
            ],
        );
        assert_eq!(creator.wizard.selection.cultures().len(), 2);
        assert!(matches!(creator.status, Some((_, StatusKind::Warning))));
        assert!(!creator.wizard.selection.has_culture("thaylen"));
    }

    #[tokio::test]
    async fn test_paths_pick_heroic_then_radiant() {
        let mut creator = sample_creator().await;
        creator.wizard.go_to(WizardStep::Paths);
        creator.reset_list();
        // Rows: Agent, Warrior, Windrunner, Lightweaver
        press(&mut creator, &[KeyCode::Down, KeyCode::Enter, KeyCode::Down, KeyCode::Enter]);
        let selection = &creator.wizard.selection;
        assert_eq!(selection.heroic_path().map(|p| p.id.as_str()), Some("warrior"));
        assert_eq!(selection.radiant_path().map(|p| p.id.as_str()), Some("windrunner"));

        // Choosing the same path again clears it
        press(&mut creator, &[KeyCode::Enter]);
        assert!(creator.wizard.selection.radiant_path().is_none());
    }

    #[tokio::test]
    async fn test_attribute_keys_respect_caps() {
        let mut creator = sample_creator().await;
        creator.wizard.go_to(WizardStep::Attributes);
        creator.reset_list();
        press(&mut creator, &[KeyCode::Right; 5]);
        assert_eq!(creator.wizard.selection.attributes().get(Attribute::Strength), 3);

        press(&mut creator, &[KeyCode::Down, KeyCode::Down, KeyCode::Right, KeyCode::Right]);
        assert_eq!(creator.wizard.selection.attributes().get(Attribute::Intellect), 2);
        assert_eq!(creator.wizard.selection.expertise().len(), 2);

        press(&mut creator, &[KeyCode::Left]);
        assert_eq!(creator.wizard.selection.expertise().len(), 1);
    }

    #[tokio::test]
    async fn test_skill_keys_respect_pool() {
        let mut creator = sample_creator().await;
        creator.wizard.go_to(WizardStep::Skills);
        creator.reset_list();
        press(
            &mut creator,
            &[
                KeyCode::Right,
                KeyCode::Right,
                KeyCode::Down,
                KeyCode::Right,
                KeyCode::Right,
                KeyCode::Down,
                KeyCode::Right,
            ],
        );
        let skills = creator.wizard.selection.skills();
        assert_eq!(skills.get("Agility"), Some(2));
        assert_eq!(skills.get("Athletics"), Some(2));
        assert_eq!(skills.get("Heavy Weaponry"), Some(0));
        assert_eq!(skills.remaining(), 0);
    }

    #[tokio::test]
    async fn test_expertise_typing() {
        let mut creator = sample_creator().await;
        creator.wizard.selection.set_attribute(Attribute::Intellect, 2);
        creator.wizard.go_to(WizardStep::Expertise);
        creator.reset_list();
        press(&mut creator, &[KeyCode::Down]);
        type_text(&mut creator, "Spren lore");
        press(&mut creator, &[KeyCode::Backspace]);
        assert_eq!(creator.wizard.selection.expertise().get(1), Some("Spren lor"));
        assert_eq!(creator.wizard.selection.expertise().get(0), Some(""));
    }

    #[tokio::test]
    async fn test_expertise_without_slots_ignores_typing() {
        let mut creator = sample_creator().await;
        creator.wizard.go_to(WizardStep::Expertise);
        creator.reset_list();
        type_text(&mut creator, "abc");
        assert!(creator.wizard.selection.expertise().is_empty());
    }

    #[tokio::test]
    async fn test_items_toggle() {
        let mut creator = sample_creator().await;
        creator.wizard.go_to(WizardStep::Items);
        creator.reset_list();
        press(&mut creator, &[KeyCode::Char(' '), KeyCode::Down, KeyCode::Char(' ')]);
        assert_eq!(creator.wizard.selection.items().len(), 2);
        press(&mut creator, &[KeyCode::Char(' ')]);
        assert_eq!(creator.wizard.selection.items().len(), 1);
        assert!(creator.wizard.selection.has_item("spear"));
    }

    #[tokio::test]
    async fn test_review_requests_submit() {
        let mut creator = sample_creator().await;
        creator.wizard.go_to(WizardStep::Review);
        press(&mut creator, &[KeyCode::Char('y')]);
        assert!(creator.submit_requested);
        press(&mut creator, &[KeyCode::Char('n')]);
        assert_eq!(creator.step(), WizardStep::Items);
    }

    #[tokio::test]
    async fn test_review_quit_ignores_case() {
        let mut creator = sample_creator().await;
        creator.wizard.go_to(WizardStep::Review);
        press(&mut creator, &[KeyCode::Char('Q')]);
        assert!(creator.finished);
        assert!(!creator.cancelled);
    }

    #[tokio::test]
    async fn test_tab_moves_between_steps() {
        let mut creator = sample_creator().await;
        press(&mut creator, &[KeyCode::Tab, KeyCode::Tab, KeyCode::BackTab]);
        assert_eq!(creator.step(), WizardStep::Ancestry);
    }

    #[test]
    fn test_pips() {
        assert_eq!(pips(2, 3), "●●○");
        assert_eq!(pips(0, 2), "○○");
    }
}
