//! Brace/bracket/paren accounting over declaration lines

/// Whether a line belongs to a comment rather than to code
#[must_use]
pub fn is_comment_line(line: &str) -> bool {
    let line = line.trim_start();
    line.starts_with("/*") || line.starts_with('*') || line.starts_with("//")
}

/// Running open-minus-close counts for the three bracket pairs
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Balance {
    pub braces: i32,
    pub brackets: i32,
    pub parens: i32,
}

impl Balance {
    /// Balance of a whole multi-line text
    #[must_use]
    pub fn of_text(text: &str) -> Self {
        let mut balance = Self::default();
        for line in text.lines() {
            balance.add_line(line);
        }
        balance
    }

    /// Account for one line; comment lines and string literals are ignored
    pub fn add_line(&mut self, line: &str) {
        if is_comment_line(line) {
            return;
        }

        let mut quote: Option<char> = None;
        let mut escaped = false;
        for c in line.chars() {
            if let Some(q) = quote {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
                continue;
            }
            match c {
                '\'' | '"' | '`' => quote = Some(c),
                '{' => self.braces += 1,
                '}' => self.braces -= 1,
                '[' => self.brackets += 1,
                ']' => self.brackets -= 1,
                '(' => self.parens += 1,
                ')' => self.parens -= 1,
                _ => {}
            }
        }
    }

    /// True once every opened pair has been closed again
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.braces <= 0 && self.brackets <= 0 && self.parens <= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_ignores_comment_lines() {
        let mut balance = Balance::default();
        balance.add_line("     * @param { number } id - The id {");
        balance.add_line("/** {");
        assert_eq!(balance, Balance::default());
    }

    #[test]
    fn test_balance_ignores_string_literals() {
        let balance = Balance::of_text("OPEN = '{',\nCLOSE = \"}\",");
        assert!(balance.is_closed());
        assert_eq!(balance.braces, 0);
    }

    #[test]
    fn test_balance_tracks_all_pairs() {
        let mut balance = Balance::default();
        balance.add_line("[key: string]: Array<(");
        assert_eq!(balance.brackets, 0);
        assert_eq!(balance.parens, 1);
        assert!(!balance.is_closed());
        balance.add_line(") => void>;");
        assert!(balance.is_closed());
    }
}
