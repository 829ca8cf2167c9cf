//! Best-effort lexical table extraction.
//!
//! Not a parser: subqueries contribute whatever their own `FROM`/`JOIN`
//! clauses name, CTE names are picked up as if they were tables, and a
//! function call after `FROM` yields the function name. Statements with no
//! recognizable clause produce an empty set.

use tablematch_domain::TableSet;

use crate::sql_scanner::{Token, scan};

/// Keywords whose next word names a table in a read-shaped statement.
/// `LEFT JOIN`, `RIGHT JOIN`, `INNER JOIN`, `OUTER JOIN`, `FULL JOIN` and
/// `CROSS JOIN` all end in a `JOIN` token, so the modifiers need no rule of
/// their own.
const READ_CLAUSE_KEYWORDS: &[&str] = &["FROM", "JOIN"];

pub fn extract_from_read(text: &str) -> TableSet {
    let tokens = scan(text);
    let mut tables = TableSet::new();
    collect_read_targets(&tokens, &mut tables);
    tables
}

/// Targets of `INSERT INTO`, `UPDATE`, `DELETE FROM` and `USING`, plus every table the
/// statement reads through its own `FROM`/`JOIN` clauses.
pub fn extract_from_write(text: &str) -> TableSet {
    let tokens = scan(text);
    let mut tables = TableSet::new();
    collect_write_targets(&tokens, &mut tables);
    collect_read_targets(&tokens, &mut tables);
    tables
}

fn collect_read_targets(tokens: &[Token], tables: &mut TableSet) {
    for (i, token) in tokens.iter().enumerate() {
        if READ_CLAUSE_KEYWORDS.iter().any(|kw| token.is_keyword(kw))
            && let Some(name) = identifier_after(tokens, i + 1)
        {
            tables.insert(name);
        }
    }
}

fn collect_write_targets(tokens: &[Token], tables: &mut TableSet) {
    for (i, token) in tokens.iter().enumerate() {
        let prev = i.checked_sub(1).map(|p| &tokens[p]);
        let is_target_clause = if token.is_keyword("INTO") {
            prev.is_some_and(|p| p.is_keyword("INSERT"))
        } else if token.is_keyword("FROM") {
            prev.is_some_and(|p| p.is_keyword("DELETE"))
        } else if token.is_keyword("USING") {
            // DELETE ... USING t; JOIN ... USING (col) is followed by punctuation.
            true
        } else if token.is_keyword("UPDATE") {
            // FOR [NO KEY] UPDATE locks rows; ON CONFLICT DO UPDATE targets the
            // INSERT table already seen.
            !prev.is_some_and(|p| p.is_keyword("FOR") || p.is_keyword("KEY") || p.is_keyword("DO"))
        } else {
            false
        };

        if is_target_clause && let Some(name) = identifier_after(tokens, i + 1) {
            tables.insert(name);
        }
    }
}

/// The word at `start`, skipping PostgreSQL's `ONLY` modifier. `None` when
/// the clause is followed by punctuation, a literal, or nothing.
fn identifier_after(tokens: &[Token], start: usize) -> Option<&str> {
    let mut token = tokens.get(start)?;
    if token.is_keyword("ONLY") {
        token = tokens.get(start + 1)?;
    }
    token.is_word().then_some(token.text.as_str())
}
