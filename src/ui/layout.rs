use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    Wide,   // ≥60 cols and ≥20 rows: full HUD and round progress bar
    Narrow, // compact HUD only
}

impl LayoutTier {
    pub fn from_area(area: Rect) -> Self {
        if area.width >= 60 && area.height >= 20 {
            LayoutTier::Wide
        } else {
            LayoutTier::Narrow
        }
    }

    pub fn show_progress_bar(&self) -> bool {
        *self == LayoutTier::Wide
    }

    pub fn compact_hud(&self) -> bool {
        *self == LayoutTier::Narrow
    }
}

pub struct GameLayout {
    pub hud: Rect,
    pub board: Rect,
    pub progress: Option<Rect>,
    pub input: Rect,
    pub footer: Rect,
    pub tier: LayoutTier,
}

impl GameLayout {
    pub fn new(area: Rect) -> Self {
        let tier = LayoutTier::from_area(area);
        let mut constraints = vec![Constraint::Length(3), Constraint::Min(6)];
        if tier.show_progress_bar() {
            constraints.push(Constraint::Length(3));
        }
        constraints.push(Constraint::Length(3));
        constraints.push(Constraint::Length(1));

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let (progress, rest) = if tier.show_progress_bar() {
            (Some(rows[2]), 3)
        } else {
            (None, 2)
        };
        Self {
            hud: rows[0],
            board: rows[1],
            progress,
            input: rows[rest],
            footer: rows[rest + 1],
            tier,
        }
    }

    /// Columns words may spawn in, inside the board's border.
    pub fn play_width(&self) -> u16 {
        self.board.width.saturating_sub(2)
    }
}

pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = "  ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints {
        if hint.is_empty() {
            continue;
        }
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width {
            current = candidate;
            has_hint = true;
        } else {
            if has_hint {
                out.push(current);
            }
            current = format!("{prefix}{hint}");
            has_hint = true;
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 48;
    const MIN_POPUP_HEIGHT: u16 = 14;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}
