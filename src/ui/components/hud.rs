use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::engine::GameSession;
use crate::ui::theme::Theme;

pub struct Hud<'a> {
    session: &'a GameSession,
    theme: &'a Theme,
    compact: bool,
}

impl<'a> Hud<'a> {
    pub fn new(session: &'a GameSession, theme: &'a Theme) -> Self {
        Self {
            session,
            theme,
            compact: false,
        }
    }

    pub fn compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }
}

/// Filled hearts for lives left, hollow ones for lives lost.
pub fn hearts(lives: u32, max: u32) -> String {
    let lost = max.saturating_sub(lives);
    "\u{2665}".repeat(lives as usize) + &"\u{2661}".repeat(lost as usize)
}

impl Widget for Hud<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let s = self.session;
        let tuning = s.tuning();

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.header_bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let label = Style::default().fg(colors.header_fg());
        let value = Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD);

        let mut spans = Vec::new();
        if !self.compact {
            spans.push(Span::styled(
                format!(" {} ", t!("app.title")),
                Style::default()
                    .fg(colors.header_fg())
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled("| ", label));
        }
        spans.extend([
            Span::styled("Score ", label),
            Span::styled(s.score().to_string(), value),
            Span::styled("  Acc ", label),
            Span::styled(format!("{}%", s.accuracy()), value),
            Span::styled("  Lvl ", label),
            Span::styled(s.level().to_string(), value),
            Span::styled("  Rnd ", label),
            Span::styled(format!("{}/{}", s.round(), tuning.rounds), value),
            Span::styled("  \u{23f1} ", label),
            Span::styled(format!("{}s", s.timer()), value),
            Span::styled("  ", label),
            Span::styled(
                hearts(s.lives_left(), tuning.max_misses),
                Style::default().fg(colors.heart()),
            ),
        ]);

        let power = match s.current_power() {
            Some(p) => Span::styled(
                format!("  {} {} [Tab]", p.icon(), p.label()),
                Style::default()
                    .fg(colors.power())
                    .add_modifier(Modifier::BOLD),
            ),
            None if !self.compact => Span::styled(
                format!("  {}", t!("game.no_power")),
                Style::default().fg(colors.accent_dim()),
            ),
            None => Span::raw(""),
        };
        spans.push(power);

        let effects = s.effects();
        if effects.frozen {
            spans.push(Span::styled("  \u{2744}", Style::default().fg(colors.accent())));
        } else if effects.slowed {
            spans.push(Span::styled("  \u{1f40c}", Style::default().fg(colors.accent())));
        }
        if s.streak() >= tuning.on_fire_streak {
            spans.push(Span::styled(
                format!("  \u{1f525}{}", s.streak()),
                Style::default().fg(colors.warning()),
            ));
        }

        Paragraph::new(Line::from(spans)).render(inner, buf);
    }
}
