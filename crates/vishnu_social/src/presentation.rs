//! Reply text: monospace tables and confirmation messages.
//!
//! Tables are drawn with ASCII borders, a `=` rule under the header and a
//! rule between rows. Long cells wrap at word boundaries. Listings are split
//! into one code block per page, and a page that would not fit in one chat
//! message is split again.

use vishnu_core::{Group, Quest};

/// Longest message the chat platform accepts, in characters.
pub const MESSAGE_LIMIT: usize = 2000;

const MAX_CELL_WIDTH: usize = 40;
const FENCE: &str = "```";

/// Headers of the quest listing.
pub const QUEST_HEADERS: [&str; 4] = ["ID", "TIER", "CREATOR", "DESCRIPTION"];

/// Headers of the group listing.
pub const GROUP_HEADERS: [&str; 5] = ["ID", "CREATOR", "START DATE", "MAX USERS", "NOTES"];

fn wrap(cell: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in cell.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        // Hard-split words longer than a line
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(word.drain(..width).collect());
        }
        let word: String = word.into_iter().collect();
        if word.is_empty() {
            continue;
        }

        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };

        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn rule(widths: &[usize], fill: char) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.extend(std::iter::repeat_n(fill, width + 2));
        line.push('+');
    }
    line
}

fn row_lines(cells: &[Vec<String>], widths: &[usize]) -> Vec<String> {
    let height = cells.iter().map(Vec::len).max().unwrap_or(1);

    (0..height)
        .map(|i| {
            let mut line = String::from("|");
            for (cell, width) in cells.iter().zip(widths) {
                let text = cell.get(i).map(String::as_str).unwrap_or("");
                let pad = width - text.chars().count();
                line.push(' ');
                line.push_str(text);
                line.extend(std::iter::repeat_n(' ', pad + 1));
                line.push('|');
            }
            line
        })
        .collect()
}

/// Draw a table without a surrounding code block.
///
/// # Examples
///
/// ```
/// use vishnu_social::presentation::render_table;
///
/// let table = render_table(&["ID", "TIER"], &[vec!["1".to_string(), "3".to_string()]]);
/// assert_eq!(
///     table,
///     "+----+------+\n| ID | TIER |\n+====+======+\n| 1  | 3    |\n+----+------+"
/// );
/// ```
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let header_cells: Vec<Vec<String>> = headers.iter().map(|h| wrap(h, MAX_CELL_WIDTH)).collect();
    let body: Vec<Vec<Vec<String>>> = rows
        .iter()
        .map(|row| row.iter().map(|c| wrap(c, MAX_CELL_WIDTH)).collect())
        .collect();

    let mut widths: Vec<usize> = vec![0; headers.len()];
    for cells in std::iter::once(&header_cells).chain(body.iter()) {
        for (width, cell) in widths.iter_mut().zip(cells) {
            let longest = cell.iter().map(|l| l.chars().count()).max().unwrap_or(0);
            *width = (*width).max(longest);
        }
    }

    let mut lines = vec![rule(&widths, '-')];
    lines.extend(row_lines(&header_cells, &widths));
    lines.push(rule(&widths, '='));
    for cells in &body {
        lines.extend(row_lines(cells, &widths));
        lines.push(rule(&widths, '-'));
    }
    lines.join("\n")
}

fn fenced(text: &str) -> String {
    format!("{}{}{}", FENCE, text, FENCE)
}

fn split_oversized(table: &str, pages: &mut Vec<String>) {
    let budget = MESSAGE_LIMIT - 2 * FENCE.len();
    let mut chunk = String::new();

    for line in table.lines() {
        let extra = line.chars().count() + usize::from(!chunk.is_empty());
        if !chunk.is_empty() && chunk.chars().count() + extra > budget {
            pages.push(fenced(&chunk));
            chunk.clear();
        }
        if !chunk.is_empty() {
            chunk.push('\n');
        }
        chunk.push_str(line);
    }

    if !chunk.is_empty() {
        pages.push(fenced(&chunk));
    }
}

fn push_page(pages: &mut Vec<String>, headers: &[&str], rows: &[Vec<String>]) {
    let table = render_table(headers, rows);
    let message = fenced(&table);

    if message.chars().count() <= MESSAGE_LIMIT {
        pages.push(message);
    } else if rows.len() > 1 {
        let (first, second) = rows.split_at(rows.len() / 2);
        push_page(pages, headers, first);
        push_page(pages, headers, second);
    } else {
        split_oversized(&table, pages);
    }
}

/// Split rows into code-block messages of at most `page_rows` rows each.
pub fn paginate(headers: &[&str], rows: &[Vec<String>], page_rows: usize) -> Vec<String> {
    let mut pages = Vec::new();
    for chunk in rows.chunks(page_rows.max(1)) {
        push_page(&mut pages, headers, chunk);
    }
    pages
}

/// Split plain text into messages that fit the message limit.
///
/// Breaks fall after a space or newline; a single run longer than the limit
/// is cut mid-word.
pub fn split_text(text: &str) -> Vec<String> {
    let mut messages = Vec::new();
    let mut chunk = String::new();
    let mut len = 0;

    for piece in text.split_inclusive([' ', '\n']) {
        for c in piece.chars().collect::<Vec<_>>().chunks(MESSAGE_LIMIT) {
            if len + c.len() > MESSAGE_LIMIT {
                messages.push(chunk.trim_end().to_string());
                chunk.clear();
                len = 0;
            }
            chunk.extend(c);
            len += c.len();
        }
    }

    if !chunk.is_empty() || messages.is_empty() {
        messages.push(chunk.trim_end().to_string());
    }
    messages
}

/// Open quests as table pages.
pub fn quest_table(quests: &[Quest], page_rows: usize) -> Vec<String> {
    let rows: Vec<Vec<String>> = quests
        .iter()
        .map(|q| {
            vec![
                q.id().to_string(),
                q.tier().clone(),
                q.creator().clone(),
                q.description().clone(),
            ]
        })
        .collect();
    paginate(&QUEST_HEADERS, &rows, page_rows)
}

/// Groups as table pages. The MAX USERS column shows `filled/max`.
pub fn group_table(groups: &[Group], page_rows: usize) -> Vec<String> {
    let rows: Vec<Vec<String>> = groups
        .iter()
        .map(|g| {
            vec![
                g.id().to_string(),
                g.creator().clone(),
                g.start_date().to_string(),
                g.capacity().to_string(),
                g.notes().clone().unwrap_or_default(),
            ]
        })
        .collect();
    paginate(&GROUP_HEADERS, &rows, page_rows)
}

/// Confirmation for `questadd`.
pub fn quest_added(quest: &Quest) -> String {
    format!(
        "Tier {} quest added by {}.\nDescription: {}",
        quest.tier(),
        quest.creator(),
        quest.description()
    )
}

/// Confirmation for `questdel`.
pub fn quest_deleted(id: i32) -> String {
    format!("Quest with ID {} deleted.", id)
}

/// Confirmation for `questcomplete` / `questuncomplete`.
pub fn quest_completion(quest: &Quest) -> String {
    if *quest.completed() {
        format!("Quest with ID {} marked as complete.", quest.id())
    } else {
        format!("Quest with ID {} marked as not complete.", quest.id())
    }
}

/// Confirmation for `groupadd`.
pub fn group_created(group: &Group) -> String {
    format!(
        "Created group with ID of {} starting on {}.",
        group.id(),
        group.start_date()
    )
}

/// Announcement posted when a group is created.
pub fn group_announcement(group: &Group, prefix: &str) -> String {
    format!(
        "--------------------\n\
         {} created a session on {} with a max player count of {}.\n\
         Use `{}groupjoin {}` to join this session.\n\
         Additional notes: {}\n\
         --------------------",
        group.creator(),
        group.start_date(),
        group.capacity().max(),
        prefix,
        group.id(),
        group.notes().as_deref().unwrap_or("")
    )
}

/// Confirmation for `groupjoin`.
pub fn group_joined(member: &str, group_id: i32) -> String {
    format!("{} joined group with ID of {}!", member, group_id)
}

/// Confirmation for `groupclose`.
pub fn group_closed(group_id: i32) -> String {
    format!("Group with ID of {} has been closed.", group_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_respects_width() {
        let lines = wrap("the quick brown fox jumps over the lazy dog", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps over", "the lazy", "dog"]);
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let lines = wrap("abcdefghijkl xy", 5);
        assert_eq!(lines, vec!["abcde", "fghij", "kl xy"]);
        assert_eq!(wrap("", 5), vec![String::new()]);
    }

    #[test]
    fn test_multiline_rows_align() {
        let long = "word ".repeat(20);
        let table = render_table(&["ID", "DESCRIPTION"], &[vec!["1".to_string(), long]]);
        let widths: Vec<usize> = table.lines().map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "ragged table:\n{}", table);
    }

    #[test]
    fn test_paginate_by_rows() {
        let rows: Vec<Vec<String>> = (1..=12).map(|i| vec![i.to_string()]).collect();
        let pages = paginate(&["ID"], &rows, 5);
        assert_eq!(pages.len(), 3);
        assert!(pages.iter().all(|p| p.starts_with(FENCE) && p.ends_with(FENCE)));
        assert!(pages[2].contains("| 12 |"));
    }

    #[test]
    fn test_split_text_breaks_at_spaces() {
        assert_eq!(split_text("You rolled: 4.\nYour total is 4"), vec!["You rolled: 4.\nYour total is 4"]);

        let rolls = vec!["20"; 1000].join(", ");
        let text = format!("You rolled: {}.\nYour total is 20000", rolls);
        let messages = split_text(&text);
        assert!(messages.len() > 1);
        assert!(messages.iter().all(|m| m.chars().count() <= MESSAGE_LIMIT));
        assert!(messages.iter().all(|m| !m.starts_with(' ')));
        assert!(messages[0].ends_with("20,"));
        assert!(messages.last().unwrap().ends_with("Your total is 20000"));
    }

    #[test]
    fn test_split_text_cuts_unbroken_runs() {
        let messages = split_text(&"x".repeat(MESSAGE_LIMIT + 10));
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].len(), MESSAGE_LIMIT);
        assert_eq!(messages[1].len(), 10);
    }

    #[test]
    fn test_oversized_pages_split() {
        let description = "lorem ".repeat(99);
        let rows: Vec<Vec<String>> = (0..5).map(|i| vec![i.to_string(), description.clone()]).collect();
        let pages = paginate(&["ID", "DESCRIPTION"], &rows, 5);
        assert!(pages.len() > 1);
        assert!(pages.iter().all(|p| p.chars().count() <= MESSAGE_LIMIT));
    }
}
