use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::engine::GameSummary;
use crate::ui::layout::pack_hint_lines;
use crate::ui::theme::Theme;

pub struct GameOver<'a> {
    pub summary: &'a GameSummary,
    pub best: u64,
    pub theme: &'a Theme,
}

impl<'a> GameOver<'a> {
    pub fn new(summary: &'a GameSummary, best: u64, theme: &'a Theme) -> Self {
        Self {
            summary,
            best,
            theme,
        }
    }

    fn is_new_best(&self) -> bool {
        self.summary.score > 0 && self.summary.score >= self.best
    }
}

impl Widget for GameOver<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("game_over.title")))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        let mut title_spans = vec![Span::styled(
            "Results",
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )];
        if self.is_new_best() {
            title_spans.push(Span::styled(
                "  New best!",
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            ));
        }
        Paragraph::new(Line::from(title_spans))
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let bold = |color| Style::default().fg(color).add_modifier(Modifier::BOLD);
        let row = |label: &'static str, value: String, style: Style| {
            Line::from(vec![
                Span::styled(label, Style::default().fg(colors.fg())),
                Span::styled(value, style),
            ])
        };

        let acc = self.summary.accuracy;
        let acc_color = if acc >= 95 {
            colors.success()
        } else if acc >= 80 {
            colors.warning()
        } else {
            colors.error()
        };

        Paragraph::new(row("  Score:    ", self.summary.score.to_string(), bold(colors.accent())))
            .render(layout[1], buf);
        Paragraph::new(row("  Accuracy: ", format!("{acc}%"), bold(acc_color)))
            .render(layout[2], buf);
        Paragraph::new(row("  Level:    ", self.summary.level.to_string(), bold(colors.fg())))
            .render(layout[3], buf);
        Paragraph::new(row("  Round:    ", self.summary.round.to_string(), bold(colors.fg())))
            .render(layout[4], buf);

        let hints: Vec<String> = t!("game_over.hints")
            .split('|')
            .map(str::to_string)
            .collect();
        let hint_refs: Vec<&str> = hints.iter().map(String::as_str).collect();
        let lines: Vec<Line> = pack_hint_lines(&hint_refs, inner.width as usize)
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.accent()))))
            .collect();
        Paragraph::new(lines).render(layout[6], buf);
    }
}
