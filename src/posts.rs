use serde_derive::*;

pub const MAX_COLUMNS: usize = 6;
pub const MAX_PER_PAGE: usize = 100;

/// Layout attributes of the posts grid.
#[derive(Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Debug)]
pub struct GridSettings {
    pub columns: usize,
    pub per_page: usize,
}

impl Default for GridSettings {
    fn default() -> Self {
        GridSettings {
            columns: 3,
            per_page: 6,
        }
    }
}

impl GridSettings {
    /// Clamp both fields to the ranges the grid renders sanely,
    /// 1..=6 columns and 1..=100 posts per page.
    pub fn normalize(&self) -> GridSettings {
        GridSettings {
            columns: self.columns.max(1).min(MAX_COLUMNS),
            per_page: self.per_page.max(1).min(MAX_PER_PAGE),
        }
    }
}

/// Cut an excerpt down to at most `max_words` words, appending an ellipsis
/// when something was cut. Runs of whitespace collapse to single spaces.
pub fn trim_excerpt(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();

    if words.len() <= max_words {
        return words.join(" ");
    }

    let mut excerpt = words[..max_words].join(" ");
    excerpt.push('…');
    excerpt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_clamps_both_ends() {
        let settings = GridSettings {
            columns: 0,
            per_page: 1000,
        };

        assert_eq!(
            settings.normalize(),
            GridSettings {
                columns: 1,
                per_page: 100,
            }
        );
    }

    #[test]
    fn normalize_keeps_in_range_values() {
        let settings = GridSettings::default();

        assert_eq!(settings.normalize(), settings);
    }

    #[test]
    fn short_excerpts_pass_through() {
        assert_eq!(trim_excerpt("two words", 5), "two words");
    }

    #[test]
    fn long_excerpts_are_cut_with_an_ellipsis() {
        assert_eq!(trim_excerpt("one two three four", 2), "one two…");
    }

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(trim_excerpt("  spaced \n out  text ", 10), "spaced out text");
    }

    #[test]
    fn empty_excerpt_stays_empty() {
        assert_eq!(trim_excerpt("", 5), "");
        assert_eq!(trim_excerpt("   ", 5), "");
    }
}
