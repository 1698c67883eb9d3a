//! Text helpers shared by the per-kind extractors.
//!
//! Everything here works on raw text and is safe on arbitrary input:
//! offsets come from regex matches (always char boundaries) or are moved
//! onto one before slicing.

use regex::Regex;

/// Compile a pattern, logging and skipping it on failure.
pub fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(err) => {
            tracing::warn!("Skipping pattern that failed to compile: {}", err);
            None
        }
    }
}

/// Compile every pattern that compiles.
pub fn compile_all<'a>(patterns: impl IntoIterator<Item = &'a str>) -> Vec<Regex> {
    patterns.into_iter().filter_map(compile).collect()
}

/// 1-based line number of a byte offset: newlines before it, plus one.
pub fn count_lines_before(content: &str, offset: usize) -> usize {
    let offset = floor_char_boundary(content, offset.min(content.len()));
    content[..offset].matches('\n').count() + 1
}

/// Largest char boundary at or before `index`.
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut end = index;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    end
}

/// Byte offset at which each line starts.
pub fn line_starts(content: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(content.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}

/// Leading whitespace width of a line.
pub fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// 0-based index of the last line of the block opened at `start_idx`.
///
/// Brace languages count `{`/`}` until the count returns to zero; with
/// `indentation` the block ends before the first non-blank line indented
/// at or below the opening line. A block that never opens is one line long.
pub fn find_block_end(lines: &[&str], start_idx: usize, indentation: bool) -> usize {
    if start_idx >= lines.len() {
        return start_idx;
    }

    if indentation {
        let base = indent_of(lines[start_idx]);
        let mut last = start_idx;
        let mut opened = false;
        for (i, line) in lines.iter().enumerate().skip(start_idx) {
            if !opened {
                if line.trim_end().ends_with(':') {
                    opened = true;
                }
                last = i;
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }
            if indent_of(line) <= base {
                return last;
            }
            last = i;
        }
        return last;
    }

    let mut depth: i64 = 0;
    let mut opened = false;
    for (i, line) in lines.iter().enumerate().skip(start_idx) {
        for ch in line.chars() {
            match ch {
                '{' => {
                    depth += 1;
                    opened = true;
                }
                '}' => depth -= 1,
                _ => {}
            }
        }
        if opened && depth <= 0 {
            return i;
        }
        // A declaration whose body never opens within a few lines has none.
        if !opened && i >= start_idx + 3 {
            return start_idx;
        }
    }

    lines.len().saturating_sub(1).max(start_idx)
}

/// Split on `sep` at nesting depth zero of `()`, `[]`, `{}` and `<>`.
pub fn split_top_level(s: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth: i32 = 0;
    let mut current = String::new();

    for ch in s.chars() {
        match ch {
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' | '>' => depth = (depth - 1).max(0),
            _ => {}
        }
        if ch == sep && depth == 0 {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    parts.push(current);

    parts
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Remove generic arguments: `Base<T, U>` becomes `Base`.
pub fn strip_generics(s: &str) -> String {
    let mut out = String::new();
    let mut depth = 0;
    for ch in s.chars() {
        match ch {
            '<' => depth += 1,
            '>' => depth = (depth - 1).max(0),
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    out.trim().to_string()
}

/// Trim identifier quoting: backticks, double quotes, brackets, single quotes.
pub fn strip_quotes(s: &str) -> &str {
    s.trim()
        .trim_matches(|c| matches!(c, '`' | '"' | '[' | ']' | '\''))
}

/// Slice `content` around `[start, end)` with `window` characters either side.
pub fn context_window(content: &str, start: usize, end: usize, window: usize) -> &str {
    let start = floor_char_boundary(content, start.min(content.len()));
    let end = floor_char_boundary(content, end.min(content.len())).max(start);

    let from = if window == 0 {
        start
    } else {
        content[..start]
            .char_indices()
            .rev()
            .nth(window - 1)
            .map(|(i, _)| i)
            .unwrap_or(0)
    };
    let to = content[end..]
        .char_indices()
        .nth(window)
        .map(|(i, _)| end + i)
        .unwrap_or(content.len());

    &content[from..to]
}

/// Collapse runs of whitespace into single spaces.
pub fn squash_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

const COMMENT_MARKERS: &[&str] = &["///", "//!", "//", "/**", "/*", "*/", "#", "*", "--"];

fn strip_comment(line: &str) -> Option<String> {
    let trimmed = line.trim();
    let marker = COMMENT_MARKERS.iter().find(|m| trimmed.starts_with(*m))?;
    let text = trimmed[marker.len()..]
        .trim()
        .trim_end_matches("*/")
        .trim()
        .to_string();
    Some(text)
}

/// Comment text attached to the declaration at `decl_idx`.
///
/// Skips decorator / annotation lines, then walks the contiguous comment
/// run above and returns its first meaningful line.
pub fn comment_above(lines: &[&str], decl_idx: usize) -> Option<String> {
    let mut idx = decl_idx.min(lines.len());
    while idx > 0 {
        let above = lines[idx - 1].trim();
        if above.starts_with('@') || (above.starts_with('[') && above.ends_with(']')) {
            idx -= 1;
        } else {
            break;
        }
    }

    let mut texts = Vec::new();
    while idx > 0 {
        match strip_comment(lines[idx - 1]) {
            Some(text) => {
                texts.push(text);
                idx -= 1;
            }
            None => break,
        }
    }

    texts
        .into_iter()
        .rev()
        .find(|t| !t.is_empty() && !t.starts_with('@') && !t.starts_with('!'))
}

/// First line of a Python docstring following the declaration at `decl_idx`.
pub fn docstring_after(lines: &[&str], decl_idx: usize) -> Option<String> {
    let header_end = (decl_idx..lines.len().min(decl_idx + 10))
        .find(|&i| lines[i].trim_end().ends_with(':'))?;

    let mut rest = lines.iter().skip(header_end + 1).filter(|l| !l.trim().is_empty());
    let first = rest.next()?.trim();
    let quote = ["\"\"\"", "'''"].into_iter().find(|q| first.starts_with(q))?;

    let inline = first[quote.len()..].trim_end_matches(quote).trim();
    if !inline.is_empty() {
        return Some(inline.to_string());
    }
    rest.next()
        .map(|l| l.trim().trim_end_matches(quote).trim().to_string())
        .filter(|l| !l.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_lines_before() {
        let content = "a\nb\nc";
        assert_eq!(count_lines_before(content, 0), 1);
        assert_eq!(count_lines_before(content, 2), 2);
        assert_eq!(count_lines_before(content, 4), 3);
        assert_eq!(count_lines_before(content, 999), 3);
    }

    #[test]
    fn test_brace_block_end() {
        let lines: Vec<&str> = "class A {\n  x() {\n  }\n}\nfoo()".lines().collect();
        assert_eq!(find_block_end(&lines, 0, false), 3);
        assert_eq!(find_block_end(&lines, 1, false), 2);
    }

    #[test]
    fn test_indent_block_end() {
        let src = "class A:\n    def f(self):\n        pass\n\n    x = 1\ny = 2";
        let lines: Vec<&str> = src.lines().collect();
        assert_eq!(find_block_end(&lines, 0, true), 4);
        assert_eq!(find_block_end(&lines, 1, true), 2);
    }

    #[test]
    fn test_split_top_level() {
        assert_eq!(
            split_top_level("a: Map<K, V>, b = f(1, 2), c", ','),
            vec!["a: Map<K, V>", "b = f(1, 2)", "c"]
        );
        assert!(split_top_level("  ", ',').is_empty());
    }

    #[test]
    fn test_context_window_is_char_safe() {
        let content = "ééé if total > 0 ééé";
        let start = content.find("if").unwrap();
        let snippet = context_window(content, start, start + 2, 3);
        assert_eq!(snippet, "éé if to");
    }

    #[test]
    fn test_comment_above() {
        let src = "/**\n * Creates a user.\n * @param x\n */\n@Post()\nfunction create() {}";
        let lines: Vec<&str> = src.lines().collect();
        assert_eq!(comment_above(&lines, 5).as_deref(), Some("Creates a user."));
        assert_eq!(comment_above(&lines, 0), None);
    }

    #[test]
    fn test_docstring_after() {
        let src = "def f(a,\n      b):\n    \"\"\"Add two numbers.\"\"\"\n    return a + b";
        let lines: Vec<&str> = src.lines().collect();
        assert_eq!(docstring_after(&lines, 0).as_deref(), Some("Add two numbers."));
    }
}
