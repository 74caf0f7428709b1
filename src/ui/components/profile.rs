use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;

use crate::store::schema::ProfileData;
use crate::ui::theme::Theme;

pub struct ProfileView<'a> {
    profile: &'a ProfileData,
    /// Bio text being edited, if the editor is open.
    editing: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> ProfileView<'a> {
    pub fn new(profile: &'a ProfileData, editing: Option<&'a str>, theme: &'a Theme) -> Self {
        Self {
            profile,
            editing,
            theme,
        }
    }
}

impl Widget for ProfileView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let p = self.profile;

        let block = Block::bordered()
            .title(format!(" {} ", t!("profile.title")))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let label = Style::default().fg(colors.fg());
        let value = Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD);
        let field = |name: &'static str, v: String| {
            Line::from(vec![Span::styled(name, label), Span::styled(v, value)])
        };
        let since = p
            .first_login
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());

        let mut lines = vec![
            field("  Name:          ", p.username.clone()),
            field("  Player id:     ", p.user_id.clone()),
            field("  Best score:    ", p.highest_score.to_string()),
            field("  Games played:  ", p.games_played.to_string()),
            field("  Avg accuracy:  ", format!("{}%", p.average_accuracy())),
            field("  Login streak:  ", format!("{} day(s)", p.login_streak)),
            field("  Playing since: ", since),
            Line::from(""),
        ];

        match self.editing {
            Some(draft) => {
                lines.push(Line::from(Span::styled(
                    format!("  {}", t!("profile.editing")),
                    Style::default().fg(colors.warning()),
                )));
                lines.push(Line::from(vec![
                    Span::styled("  > ", Style::default().fg(colors.accent())),
                    Span::styled(draft.to_string(), Style::default().fg(colors.fg())),
                    Span::styled("\u{2588}", Style::default().fg(colors.accent())),
                ]));
            }
            None => {
                let bio = if p.bio.is_empty() { "-" } else { p.bio.as_str() };
                lines.push(Line::from(Span::styled("  Bio:", label)));
                lines.push(Line::from(Span::styled(
                    format!("  {bio}"),
                    Style::default().fg(colors.fg()),
                )));
            }
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", t!("profile.hints").replace('|', "  ")),
            Style::default().fg(colors.accent_dim()),
        )));

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
