use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::engine::GameSession;
use crate::engine::fall::ActiveWord;
use crate::engine::matcher::PrefixMatch;
use crate::ui::components::notice_text;
use crate::ui::theme::Theme;

/// The play field: falling words, the floor, and any overlay text.
pub struct Board<'a> {
    session: &'a GameSession,
    theme: &'a Theme,
}

impl<'a> Board<'a> {
    pub fn new(session: &'a GameSession, theme: &'a Theme) -> Self {
        Self { session, theme }
    }
}

/// Row of a word inside a field `height` rows tall.
pub fn word_row(word: &ActiveWord, height: u16) -> u16 {
    if height == 0 {
        return 0;
    }
    let span = (height - 1) as f64;
    (word.progress() * span).round() as u16
}

fn word_spans<'s>(
    word: &'s ActiveWord,
    feedback: Option<&'s PrefixMatch>,
    theme: &Theme,
) -> Vec<Span<'s>> {
    let colors = &theme.colors;
    if word.slashed {
        return vec![Span::styled(
            word.text.as_str(),
            Style::default()
                .fg(colors.word_slashed())
                .add_modifier(Modifier::CROSSED_OUT),
        )];
    }
    let Some(m) = feedback.filter(|m| m.target == word.id) else {
        return vec![Span::styled(
            word.text.as_str(),
            Style::default().fg(colors.word()).add_modifier(Modifier::BOLD),
        )];
    };

    let mut spans = vec![Span::styled(
        m.matched.clone(),
        Style::default()
            .fg(colors.word_matched())
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(wrong) = m.wrong {
        spans.push(Span::styled(
            wrong.to_string(),
            Style::default()
                .fg(colors.word_wrong())
                .bg(colors.word_wrong_bg()),
        ));
    }
    spans.push(Span::styled(
        m.rest.clone(),
        Style::default().fg(colors.word()).add_modifier(Modifier::BOLD),
    ));
    spans
}

fn centered_line(area: Rect, row: u16, line: Line<'_>, buf: &mut Buffer) {
    if row >= area.height {
        return;
    }
    let target = Rect::new(area.x, area.y + row, area.width, 1);
    Paragraph::new(line)
        .alignment(Alignment::Center)
        .render(target, buf);
}

impl Widget for Board<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let floor_style = Style::default().fg(colors.floor());

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.board_bg()));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let floor_y = area.y + area.height - 1;
        for x in area.x..area.x + area.width {
            buf[(x, floor_y)].set_style(floor_style);
        }

        if let Some(remaining) = self.session.intermission_remaining() {
            let text = t!(
                "game.round_starts",
                round = self.session.round(),
                secs = remaining
            );
            let line = Line::from(Span::styled(
                text.to_string(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ));
            centered_line(inner, inner.height / 2, line, buf);
            return;
        }

        let feedback = self.session.feedback();
        for word in self.session.active_words() {
            let row = word_row(word, inner.height);
            let width = word.text.chars().count() as u16;
            let x = word.x.min(inner.width.saturating_sub(width));
            let line = Line::from(word_spans(word, feedback.as_ref(), self.theme));
            let target = Rect::new(
                inner.x + x,
                inner.y + row,
                inner.width.saturating_sub(x),
                1,
            );
            Paragraph::new(line).render(target, buf);
        }

        if let Some(notice) = self.session.notice() {
            let line = Line::from(Span::styled(
                notice_text(notice),
                Style::default()
                    .fg(colors.warning())
                    .add_modifier(Modifier::BOLD),
            ));
            centered_line(inner, 0, line, buf);
        }

        if self.session.is_paused() {
            let mid = inner.height / 2;
            centered_line(
                inner,
                mid,
                Line::from(Span::styled(
                    t!("game.paused").to_string(),
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                )),
                buf,
            );
            centered_line(
                inner,
                mid + 1,
                Line::from(Span::styled(
                    t!("game.paused_hint").replace('|', "  "),
                    Style::default().fg(colors.fg()),
                )),
                buf,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fall::WordId;

    #[test]
    fn test_word_row_spans_field() {
        let mut w = ActiveWord::new(WordId(0), "neon".to_string(), 2.0, 0);
        assert_eq!(word_row(&w, 11), 0);
        w.elapsed = 1.0;
        assert_eq!(word_row(&w, 11), 5);
        w.elapsed = 2.0;
        assert_eq!(word_row(&w, 11), 10);
    }

    #[test]
    fn test_feedback_splits_word() {
        let theme = Theme::default();
        let w = ActiveWord::new(WordId(3), "cyber".to_string(), 2.0, 0);
        let m = PrefixMatch {
            target: WordId(3),
            matched: "cy".to_string(),
            wrong: Some('b'),
            rest: "er".to_string(),
            ok: false,
        };
        let spans = word_spans(&w, Some(&m), &theme);
        let text: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, vec!["cy", "b", "er"]);
    }

    #[test]
    fn test_other_word_renders_plain() {
        let theme = Theme::default();
        let w = ActiveWord::new(WordId(1), "neon".to_string(), 2.0, 0);
        let m = PrefixMatch {
            target: WordId(9),
            matched: String::new(),
            wrong: None,
            rest: "orbit".to_string(),
            ok: true,
        };
        assert_eq!(word_spans(&w, Some(&m), &theme).len(), 1);
    }
}
