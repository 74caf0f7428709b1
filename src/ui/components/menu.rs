use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Play,
    Leaderboard,
    Profile,
    Quit,
}

pub struct MenuItem {
    pub key: String,
    pub label: String,
    pub description: String,
    pub action: MenuAction,
}

pub struct Menu<'a> {
    pub items: Vec<MenuItem>,
    pub selected: usize,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        let item = |key: &str, label: String, description: String, action| MenuItem {
            key: key.to_string(),
            label,
            description,
            action,
        };
        Self {
            items: vec![
                item(
                    "1",
                    t!("menu.play").to_string(),
                    t!("menu.play_desc").to_string(),
                    MenuAction::Play,
                ),
                item(
                    "l",
                    t!("menu.leaderboard").to_string(),
                    t!("menu.leaderboard_desc").to_string(),
                    MenuAction::Leaderboard,
                ),
                item(
                    "p",
                    t!("menu.profile").to_string(),
                    t!("menu.profile_desc").to_string(),
                    MenuAction::Profile,
                ),
                item(
                    "q",
                    t!("menu.quit").to_string(),
                    t!("menu.quit_desc").to_string(),
                    MenuAction::Quit,
                ),
            ],
            selected: 0,
            theme,
        }
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len() - 1;
        }
    }

    pub fn selected_action(&self) -> Option<MenuAction> {
        self.items.get(self.selected).map(|i| i.action)
    }

    /// The action bound to a shortcut key, if any.
    pub fn action_for_key(&self, key: char) -> Option<MenuAction> {
        self.items
            .iter()
            .find(|i| i.key.chars().eq(std::iter::once(key)))
            .map(|i| i.action)
    }
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let [banner, _, list] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Length(1), Constraint::Min(0)])
            .areas(inner);

        Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                t!("app.title").to_string(),
                Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                t!("app.tagline").to_string(),
                Style::default().fg(colors.accent_dim()),
            )),
        ])
        .alignment(Alignment::Center)
        .render(banner, buf);

        // Descriptions only fit when every item gets two rows.
        let roomy = list.height as usize >= self.items.len() * 2;
        let mut lines = Vec::new();
        for (i, item) in self.items.iter().enumerate() {
            let style = if i == self.selected {
                Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            let marker = if i == self.selected { "\u{25b6}" } else { " " };
            lines.push(Line::from(vec![
                Span::styled(format!(" {marker} "), style),
                Span::styled(format!("[{}] ", item.key), Style::default().fg(colors.power())),
                Span::styled(item.label.clone(), style),
            ]));
            if roomy {
                lines.push(Line::from(Span::styled(
                    format!("       {}", item.description),
                    Style::default().fg(colors.accent_dim()),
                )));
            }
        }
        Paragraph::new(lines).render(list, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_wraps_both_ways() {
        let theme = Theme::default();
        let mut menu = Menu::new(&theme);
        assert_eq!(menu.selected_action(), Some(MenuAction::Play));
        menu.prev();
        assert_eq!(menu.selected_action(), Some(MenuAction::Quit));
        menu.next();
        menu.next();
        assert_eq!(menu.selected_action(), Some(MenuAction::Leaderboard));
    }

    #[test]
    fn test_labels_are_translated() {
        let theme = Theme::default();
        let menu = Menu::new(&theme);
        assert_eq!(menu.items[0].label, "Play");
    }

    #[test]
    fn test_shortcut_keys() {
        let theme = Theme::default();
        let menu = Menu::new(&theme);
        assert_eq!(menu.action_for_key('1'), Some(MenuAction::Play));
        assert_eq!(menu.action_for_key('p'), Some(MenuAction::Profile));
        assert_eq!(menu.action_for_key('x'), None);
    }
}
