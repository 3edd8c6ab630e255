use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Rect};

pub struct Layout {
    /// Area inside the outer border
    pub inner_area: Rect,
    /// Clock, date and background line
    pub header_area: Rect,
    pub command_area: Rect,
    /// Open panel; zero height when no panel is active
    pub panel_area: Rect,
    pub status_area: Rect,
}

impl Layout {
    /// Minimum terminal size, excluding the outer border.
    /// Height: header (1) + command bar (3) + panel (4) + status (1) + 1 spare.
    pub const MIN_WIDTH: u16 = 40;
    pub const MIN_HEIGHT: u16 = 10;

    pub fn calculate(size: Rect, panel_open: bool) -> Self {
        let width = size.width.max(Self::MIN_WIDTH + 2);
        let height = size.height.max(Self::MIN_HEIGHT + 2);
        let size = Rect::new(size.x, size.y, width, height);

        let inner_area = Rect::new(
            size.x + 1,
            size.y + 1,
            size.width.saturating_sub(2),
            size.height.saturating_sub(2),
        );

        // Without a panel the command bar sits a third of the way down, like a search page
        let constraints = if panel_open {
            [
                Constraint::Length(1),
                Constraint::Length(0),
                Constraint::Length(3),
                Constraint::Min(4),
                Constraint::Length(1),
            ]
        } else {
            [
                Constraint::Length(1),
                Constraint::Percentage(30),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ]
        };
        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner_area);

        let panel_area = if panel_open {
            vertical[3]
        } else {
            Rect::new(vertical[3].x, vertical[3].y, vertical[3].width, 0)
        };

        Self {
            inner_area,
            header_area: vertical[0],
            command_area: vertical[2],
            panel_area,
            status_area: vertical[4],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_gets_remaining_height() {
        let layout = Layout::calculate(Rect::new(0, 0, 80, 24), true);
        assert_eq!(layout.inner_area, Rect::new(1, 1, 78, 22));
        assert_eq!(layout.header_area.height, 1);
        assert_eq!(layout.command_area.height, 3);
        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.panel_area.height, 22 - 1 - 3 - 1);
    }

    #[test]
    fn no_panel_leaves_panel_area_empty() {
        let layout = Layout::calculate(Rect::new(0, 0, 80, 24), false);
        assert_eq!(layout.panel_area.height, 0);
        assert!(layout.command_area.y > layout.header_area.y + 1);
    }

    #[test]
    fn tiny_terminal_is_clamped_to_minimum() {
        let layout = Layout::calculate(Rect::new(0, 0, 10, 5), true);
        assert_eq!(layout.inner_area.width, Layout::MIN_WIDTH);
        assert_eq!(layout.inner_area.height, Layout::MIN_HEIGHT);
    }
}
