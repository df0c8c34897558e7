//! Route picker shown at `/`

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::models::Route;
use crate::store::FlowContext;
use crate::tui::{
    traits::{Screen, ScreenAction},
    ui::{SelectableList, Styles},
};

/// One entry of the menu
#[derive(Debug, Clone)]
pub struct MenuOption {
    pub route: Route,
    pub description: &'static str,
    pub shortcut: char,
}

impl MenuOption {
    pub fn new(route: Route, description: &'static str, shortcut: char) -> Self {
        Self {
            route,
            description,
            shortcut,
        }
    }
}

pub struct MenuScreen {
    pub options: SelectableList<MenuOption>,
}

impl Default for MenuScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuScreen {
    pub fn new() -> Self {
        let options = vec![
            MenuOption::new(Route::Login, "Masuk ke akun Anda", '1'),
            MenuOption::new(Route::Register, "Data pendaftaran rekening", '2'),
            MenuOption::new(Route::RegisterPin, "Atur pin transaksi dan selesaikan registrasi", '3'),
            MenuOption::new(Route::Dashboard, "Halaman utama setelah login", '4'),
            MenuOption::new(Route::ForgotPassword, "Kirim kode verifikasi ke email", '5'),
            MenuOption::new(Route::Otp, "Masukkan kode verifikasi 4 digit", '6'),
            MenuOption::new(Route::NewPassword, "Buat password baru", '7'),
        ];

        Self {
            options: SelectableList::new(options),
        }
    }

    fn draw_title(&self, f: &mut Frame, area: Rect) {
        let title = Paragraph::new(vec![
            Line::from(Span::styled(
                "LumiBank",
                Styles::title().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled("Registrasi & pemulihan akun", Styles::info())),
        ])
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn draw_menu(&mut self, f: &mut Frame, area: Rect) {
        let selected = self.options.selected_index();
        let items: Vec<ListItem> = self
            .options
            .items
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let style = if Some(i) == selected {
                    Styles::selected()
                } else {
                    Style::default()
                };

                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(format!("[{}] ", option.shortcut), Styles::info()),
                        Span::styled(option.route.title(), style.add_modifier(Modifier::BOLD)),
                        Span::styled(format!("  {}", option.route.path()), Styles::inactive()),
                    ]),
                    Line::from(Span::styled(
                        format!("     {}", option.description),
                        if Some(i) == selected { style } else { Styles::inactive() },
                    )),
                ])
            })
            .collect();

        let menu = List::new(items)
            .block(
                Block::default()
                    .title("Menu")
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            )
            .highlight_style(Styles::selected());

        f.render_stateful_widget(menu, area, &mut self.options.state);
    }
}

impl Screen for MenuScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);

        self.draw_title(f, chunks[0]);
        self.draw_menu(f, chunks[1]);
    }

    fn handle_key_event(&mut self, key: KeyEvent, _flows: &mut FlowContext) -> Result<ScreenAction> {
        let action = match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.options.previous();
                ScreenAction::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.options.next();
                ScreenAction::None
            }
            KeyCode::Enter => self
                .options
                .selected()
                .map(|option| ScreenAction::NavigateTo(option.route))
                .unwrap_or(ScreenAction::None),
            KeyCode::Char(c) => self
                .options
                .items
                .iter()
                .find(|option| option.shortcut == c)
                .map(|option| ScreenAction::NavigateTo(option.route))
                .unwrap_or(ScreenAction::None),
            _ => ScreenAction::None,
        };
        Ok(action)
    }

    fn help_text(&self) -> &'static str {
        "↑/↓ pilih halaman, Enter buka, 1-7 langsung ke halaman"
    }
}
