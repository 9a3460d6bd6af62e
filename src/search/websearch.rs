//! Web-search style query grammar.
//!
//! - whitespace separated words must all match
//! - `or` (any case) between clauses separates alternatives; AND binds tighter
//! - `"quoted words"` must appear contiguously
//! - a leading `-` excludes a word or a quoted phrase
//!
//! Anything else is treated as text; the grammar never fails to parse.

/// One matchable unit of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub text: String,
    pub phrase: bool,
    pub negated: bool,
}

/// Disjunction of conjunctions: matches when any group matches entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebQuery {
    pub groups: Vec<Vec<Clause>>,
}

impl WebQuery {
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(Vec::is_empty)
    }
}

pub fn parse(input: &str) -> WebQuery {
    let mut groups: Vec<Vec<Clause>> = Vec::new();
    let mut current: Vec<Clause> = Vec::new();
    let mut pending_or = false;

    let mut chars = input.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let mut negated = false;
        if c == '-' {
            chars.next();
            match chars.peek() {
                Some(next) if !next.is_whitespace() => negated = true,
                _ => continue,
            }
        }

        let (text, phrase) = if chars.peek() == Some(&'"') {
            chars.next();
            let mut text = String::new();
            for ch in chars.by_ref() {
                if ch == '"' {
                    break;
                }
                text.push(ch);
            }
            (text, true)
        } else {
            let mut text = String::new();
            while let Some(&ch) = chars.peek() {
                if ch.is_whitespace() || ch == '"' {
                    break;
                }
                text.push(ch);
                chars.next();
            }
            (text, false)
        };

        if text.trim().is_empty() {
            continue;
        }
        if !phrase && !negated && text.eq_ignore_ascii_case("or") {
            pending_or = true;
            continue;
        }

        if pending_or && !current.is_empty() {
            groups.push(std::mem::take(&mut current));
        }
        pending_or = false;
        current.push(Clause {
            text,
            phrase,
            negated,
        });
    }

    if !current.is_empty() {
        groups.push(current);
    }
    WebQuery { groups }
}
