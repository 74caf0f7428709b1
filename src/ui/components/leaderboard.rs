use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::store::remote::RemoteScore;
use crate::store::schema::ScoreRecord;
use crate::ui::theme::Theme;

/// One printable leaderboard row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    pub name: String,
    pub score: u64,
    pub accuracy: u32,
    pub level: u32,
}

impl From<&ScoreRecord> for Row {
    fn from(r: &ScoreRecord) -> Self {
        Self {
            name: r.name.clone(),
            score: r.score,
            accuracy: r.accuracy,
            level: r.level,
        }
    }
}

impl From<&RemoteScore> for Row {
    fn from(r: &RemoteScore) -> Self {
        Self {
            name: r.name.clone(),
            score: r.score,
            accuracy: r.accuracy,
            level: r.level,
        }
    }
}

pub fn format_row(rank: usize, row: &Row, name_width: usize) -> String {
    let name: String = row.name.chars().take(name_width).collect();
    format!(
        "{rank:>3}. {name:<name_width$} {score:>7}  {acc:>3}%  L{level}",
        score = row.score,
        acc = row.accuracy,
        level = row.level,
    )
}

pub struct Leaderboard<'a> {
    local: Vec<Row>,
    remote: Option<Vec<Row>>,
    theme: &'a Theme,
}

impl<'a> Leaderboard<'a> {
    pub fn new(local: &[ScoreRecord], remote: Option<&[RemoteScore]>, theme: &'a Theme) -> Self {
        Self {
            local: local.iter().map(Row::from).collect(),
            remote: remote.map(|rows| rows.iter().map(Row::from).collect()),
            theme,
        }
    }

    fn column(&self, title: &str, rows: Option<&[Row]>, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(format!(" {title} "))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        let lines: Vec<Line> = match rows {
            None => vec![Line::from(Span::styled(
                t!("leaderboard.offline").to_string(),
                Style::default().fg(colors.accent_dim()),
            ))],
            Some([]) => vec![Line::from(Span::styled(
                t!("leaderboard.empty").to_string(),
                Style::default().fg(colors.accent_dim()),
            ))],
            Some(rows) => {
                let name_width = (inner.width as usize).saturating_sub(24).clamp(4, 16);
                rows.iter()
                    .take(inner.height as usize)
                    .enumerate()
                    .map(|(i, row)| {
                        let style = if i == 0 {
                            Style::default()
                                .fg(colors.power())
                                .add_modifier(Modifier::BOLD)
                        } else {
                            Style::default().fg(colors.fg())
                        };
                        Line::from(Span::styled(format_row(i + 1, row, name_width), style))
                    })
                    .collect()
            }
        };
        Paragraph::new(lines).render(inner, buf);
    }
}

impl Widget for Leaderboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(format!(" {} ", t!("leaderboard.title")))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(inner);
        self.column(&t!("leaderboard.local"), Some(self.local.as_slice()), cols[0], buf);
        self.column(&t!("leaderboard.remote"), self.remote.as_deref(), cols[1], buf);
    }
}
