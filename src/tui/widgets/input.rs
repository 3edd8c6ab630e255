use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Submitted,
    Cancelled,
    Changed,
    /// Key not handled by the input
    Ignored,
}

/// Single-line text field; the cursor is a char index
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    chars: Vec<char>,
    cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: &str) -> Self {
        let chars: Vec<char> = value.chars().collect();
        let cursor = chars.len();
        Self { chars, cursor }
    }

    pub fn value(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }

    pub fn insert(&mut self, c: char) {
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> InputEvent {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => InputEvent::Submitted,
            KeyCode::Esc => InputEvent::Cancelled,
            KeyCode::Char('u') if ctrl => {
                self.chars.drain(..self.cursor);
                self.cursor = 0;
                InputEvent::Changed
            }
            KeyCode::Char('a') if ctrl => {
                self.cursor = 0;
                InputEvent::Changed
            }
            KeyCode::Char('e') if ctrl => {
                self.cursor = self.chars.len();
                InputEvent::Changed
            }
            KeyCode::Char(_) if ctrl || key.modifiers.contains(KeyModifiers::ALT) => {
                InputEvent::Ignored
            }
            KeyCode::Char(c) => {
                self.insert(c);
                InputEvent::Changed
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.chars.remove(self.cursor);
                }
                InputEvent::Changed
            }
            KeyCode::Delete => {
                if self.cursor < self.chars.len() {
                    self.chars.remove(self.cursor);
                }
                InputEvent::Changed
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                InputEvent::Changed
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.chars.len());
                InputEvent::Changed
            }
            KeyCode::Home => {
                self.cursor = 0;
                InputEvent::Changed
            }
            KeyCode::End => {
                self.cursor = self.chars.len();
                InputEvent::Changed
            }
            _ => InputEvent::Ignored,
        }
    }

    /// Slice of the value that fits `width` columns while keeping the cursor visible,
    /// plus the cursor's column within that slice
    pub fn visible(&self, width: usize) -> (String, usize) {
        if width == 0 {
            return (String::new(), 0);
        }
        let start = self.cursor.saturating_sub(width.saturating_sub(1));
        let end = (start + width).min(self.chars.len());
        (self.chars[start..end].iter().collect(), self.cursor - start)
    }
}

/// Multi-line editor for note content. Enter inserts a newline,
/// Ctrl+S submits, Esc cancels.
#[derive(Debug, Clone)]
pub struct TextArea {
    lines: Vec<Vec<char>>,
    row: usize,
    col: usize,
}

impl Default for TextArea {
    fn default() -> Self {
        Self {
            lines: vec![Vec::new()],
            row: 0,
            col: 0,
        }
    }
}

impl TextArea {
    pub fn with_value(value: &str) -> Self {
        let mut lines: Vec<Vec<char>> = value.split('\n').map(|l| l.chars().collect()).collect();
        if lines.is_empty() {
            lines.push(Vec::new());
        }
        let row = lines.len() - 1;
        let col = lines[row].len();
        Self { lines, row, col }
    }

    pub fn value(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.iter().collect()).collect()
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> InputEvent {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('s') if ctrl => InputEvent::Submitted,
            KeyCode::Esc => InputEvent::Cancelled,
            KeyCode::Char(_) if ctrl || key.modifiers.contains(KeyModifiers::ALT) => {
                InputEvent::Ignored
            }
            KeyCode::Char(c) => {
                self.lines[self.row].insert(self.col, c);
                self.col += 1;
                InputEvent::Changed
            }
            KeyCode::Enter => {
                let rest = self.lines[self.row].split_off(self.col);
                self.row += 1;
                self.lines.insert(self.row, rest);
                self.col = 0;
                InputEvent::Changed
            }
            KeyCode::Backspace => {
                if self.col > 0 {
                    self.col -= 1;
                    self.lines[self.row].remove(self.col);
                } else if self.row > 0 {
                    let line = self.lines.remove(self.row);
                    self.row -= 1;
                    self.col = self.lines[self.row].len();
                    self.lines[self.row].extend(line);
                }
                InputEvent::Changed
            }
            KeyCode::Left => {
                if self.col > 0 {
                    self.col -= 1;
                } else if self.row > 0 {
                    self.row -= 1;
                    self.col = self.lines[self.row].len();
                }
                InputEvent::Changed
            }
            KeyCode::Right => {
                if self.col < self.lines[self.row].len() {
                    self.col += 1;
                } else if self.row + 1 < self.lines.len() {
                    self.row += 1;
                    self.col = 0;
                }
                InputEvent::Changed
            }
            KeyCode::Up => {
                if self.row > 0 {
                    self.row -= 1;
                    self.col = self.col.min(self.lines[self.row].len());
                }
                InputEvent::Changed
            }
            KeyCode::Down => {
                if self.row + 1 < self.lines.len() {
                    self.row += 1;
                    self.col = self.col.min(self.lines[self.row].len());
                }
                InputEvent::Changed
            }
            KeyCode::Home => {
                self.col = 0;
                InputEvent::Changed
            }
            KeyCode::End => {
                self.col = self.lines[self.row].len();
                InputEvent::Changed
            }
            _ => InputEvent::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(input: &mut TextInput, s: &str) {
        for c in s.chars() {
            input.handle_key(&key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn typing_and_editing() {
        let mut input = TextInput::new();
        type_str(&mut input, "helo");
        input.handle_key(&key(KeyCode::Left));
        type_str(&mut input, "l");
        assert_eq!(input.value(), "hello");
        input.handle_key(&key(KeyCode::End));
        input.handle_key(&key(KeyCode::Backspace));
        assert_eq!(input.value(), "hell");
        assert_eq!(input.handle_key(&key(KeyCode::Enter)), InputEvent::Submitted);
    }

    #[test]
    fn visible_window_follows_cursor() {
        let input = TextInput::with_value("abcdefghij");
        let (text, col) = input.visible(4);
        assert_eq!(text, "hij");
        assert_eq!(col, 3);
    }

    #[test]
    fn text_area_newlines_and_join() {
        let mut area = TextArea::with_value("ab");
        area.handle_key(&key(KeyCode::Left));
        area.handle_key(&key(KeyCode::Enter));
        assert_eq!(area.value(), "a\nb");
        area.handle_key(&key(KeyCode::Backspace));
        assert_eq!(area.value(), "ab");
        assert_eq!(area.cursor(), (0, 1));
        assert_eq!(
            area.handle_key(&KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            InputEvent::Submitted
        );
    }
}
