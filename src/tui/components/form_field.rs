//! Form field component for user input

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::tui::{traits::FormHandler, ui::Styles};
use crate::validation::{FormValues, ValidationErrors};

const MASK_CHAR: char = '•';

/// Rows taken by one field: bordered input plus the error line
pub const FIELD_HEIGHT: u16 = 4;

/// Type of form field
#[derive(Debug, Clone, PartialEq)]
pub enum FormFieldType {
    Text,
    Numeric,
    Password { revealed: bool },
}

/// Individual form field
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: &'static str,
    pub label: String,
    pub value: String,
    pub placeholder: String,
    pub field_type: FormFieldType,
    pub is_focused: bool,
    /// Cursor position in characters, not bytes
    pub cursor_position: usize,
    pub validation_error: Option<String>,
}

impl FormField {
    pub fn new(name: &'static str, label: &str, field_type: FormFieldType) -> Self {
        Self {
            name,
            label: label.to_string(),
            value: String::new(),
            placeholder: String::new(),
            field_type,
            is_focused: false,
            cursor_position: 0,
            validation_error: None,
        }
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self.cursor_position = value.chars().count();
        self
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.is_focused = focused;
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor_position);
        self.value.insert(at, c);
        self.cursor_position += 1;
        self.validation_error = None;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let at = self.byte_index(self.cursor_position);
            self.value.remove(at);
            self.validation_error = None;
        }
    }

    pub fn delete_char_forward(&mut self) {
        if self.cursor_position < self.char_count() {
            let at = self.byte_index(self.cursor_position);
            self.value.remove(at);
            self.validation_error = None;
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.char_count() {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_to_start(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor_position = self.char_count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor_position = 0;
        self.validation_error = None;
        if let FormFieldType::Password { revealed } = &mut self.field_type {
            *revealed = false;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn is_password(&self) -> bool {
        matches!(self.field_type, FormFieldType::Password { .. })
    }

    pub fn is_revealed(&self) -> bool {
        matches!(self.field_type, FormFieldType::Password { revealed: true })
    }

    /// Flip show/hide; returns false for non-password fields
    pub fn toggle_visibility(&mut self) -> bool {
        match &mut self.field_type {
            FormFieldType::Password { revealed } => {
                *revealed = !*revealed;
                true
            }
            _ => false,
        }
    }

    /// Value as it should appear on screen
    pub fn display_value(&self) -> String {
        match self.field_type {
            FormFieldType::Password { revealed: false } => {
                std::iter::repeat(MASK_CHAR).take(self.char_count()).collect()
            }
            _ => self.value.clone(),
        }
    }

    /// Render the input block and the inline error line below it
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(1)])
            .split(area);

        let shown = self.display_value();
        let (display_text, text_style) = if self.value.is_empty() && !self.placeholder.is_empty() {
            (self.placeholder.clone(), Styles::inactive())
        } else {
            (shown.clone(), Styles::default())
        };

        let border_style = if self.validation_error.is_some() {
            Styles::error()
        } else if self.is_focused {
            Styles::active_border()
        } else {
            Styles::inactive_border()
        };

        let mut title = vec![Span::raw(self.label.clone())];
        if self.validation_error.is_some() {
            title.push(Span::styled(" ⚠", Styles::error()));
        }
        if self.is_password() {
            let hint = if self.is_revealed() { " [F2: sembunyikan]" } else { " [F2: tampilkan]" };
            title.push(Span::styled(hint, Styles::inactive()));
        }

        let block = Block::default()
            .title(Line::from(title))
            .borders(Borders::ALL)
            .border_style(border_style);

        let paragraph = Paragraph::new(display_text).style(text_style).block(block);
        f.render_widget(paragraph, chunks[0]);

        if let Some(ref error) = self.validation_error {
            f.render_widget(
                Paragraph::new(error.as_str()).style(Styles::error()),
                chunks[1],
            );
        }

        if self.is_focused {
            let before: String = shown.chars().take(self.cursor_position).collect();
            let cursor_x = chunks[0].x + 1 + before.width() as u16;
            let cursor_y = chunks[0].y + 1;
            if cursor_x < chunks[0].x + chunks[0].width.saturating_sub(1) {
                f.set_cursor(cursor_x, cursor_y);
            }
        }
    }
}

/// Form container that manages multiple fields
#[derive(Debug, Clone)]
pub struct Form {
    pub fields: Vec<FormField>,
    pub current_field: usize,
}

impl Form {
    pub fn new(fields: Vec<FormField>) -> Self {
        let mut form = Self {
            fields,
            current_field: 0,
        };
        form.update_focus();
        form
    }

    fn update_focus(&mut self) {
        for (i, field) in self.fields.iter_mut().enumerate() {
            field.set_focus(i == self.current_field);
        }
    }

    pub fn get_field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn value(&self, name: &str) -> &str {
        self.get_field(name).map(|f| f.value.as_str()).unwrap_or("")
    }

    pub fn get_current_field_mut(&mut self) -> Option<&mut FormField> {
        self.fields.get_mut(self.current_field)
    }

    /// Current values keyed by field name
    pub fn values(&self) -> FormValues {
        self.fields
            .iter()
            .map(|f| (f.name.to_string(), f.value.clone()))
            .collect()
    }

    /// Replace every field's error with the outcome of the last validation
    pub fn apply_errors(&mut self, errors: &ValidationErrors) {
        for field in &mut self.fields {
            field.validation_error = errors.get(field.name).map(str::to_string);
        }
        // focus the first field that failed
        if let Some(index) = self.fields.iter().position(|f| f.validation_error.is_some()) {
            self.set_current_field(index);
        }
    }

    pub fn has_errors(&self) -> bool {
        self.fields.iter().any(|f| f.validation_error.is_some())
    }

    pub fn clear(&mut self) {
        for field in &mut self.fields {
            field.clear();
        }
        self.current_field = 0;
        self.update_focus();
    }

    pub fn height(&self) -> u16 {
        FIELD_HEIGHT * self.fields.len() as u16
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let constraints: Vec<Constraint> = self
            .fields
            .iter()
            .map(|_| Constraint::Length(FIELD_HEIGHT))
            .collect();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (field, chunk) in self.fields.iter().zip(chunks.iter()) {
            field.render(f, *chunk);
        }
    }
}

impl FormHandler for Form {
    fn get_current_field(&self) -> usize {
        self.current_field
    }

    fn set_current_field(&mut self, field: usize) {
        if field < self.fields.len() {
            self.current_field = field;
            self.update_focus();
        }
    }

    fn get_field_count(&self) -> usize {
        self.fields.len()
    }

    fn handle_char_input(&mut self, c: char) {
        if let Some(field) = self.get_current_field_mut() {
            field.insert_char(c);
        }
    }

    fn handle_backspace(&mut self) {
        if let Some(field) = self.get_current_field_mut() {
            field.delete_char();
        }
    }

    fn handle_delete(&mut self) {
        if let Some(field) = self.get_current_field_mut() {
            field.delete_char_forward();
        }
    }

    fn handle_cursor_left(&mut self) {
        if let Some(field) = self.get_current_field_mut() {
            field.move_cursor_left();
        }
    }

    fn handle_cursor_right(&mut self) {
        if let Some(field) = self.get_current_field_mut() {
            field.move_cursor_right();
        }
    }

    fn handle_cursor_home(&mut self) {
        if let Some(field) = self.get_current_field_mut() {
            field.move_cursor_to_start();
        }
    }

    fn handle_cursor_end(&mut self) {
        if let Some(field) = self.get_current_field_mut() {
            field.move_cursor_to_end();
        }
    }

    fn toggle_current_visibility(&mut self) -> bool {
        self.get_current_field_mut()
            .map(FormField::toggle_visibility)
            .unwrap_or(false)
    }
}
