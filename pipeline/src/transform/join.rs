//! Key joins between tables.
//!
//! Column layout of a join result:
//!
//! - left columns, then right columns
//! - when both sides use the same key name the right key is dropped
//! - any other name present on both sides gets `_x` (left) / `_y` (right)
//!
//! Missing key values match each other. A key column absent from either
//! side matches nothing: inner joins come out empty, left joins keep every
//! left row with missing right-side cells. This is logged, not raised.

use std::collections::{HashMap, HashSet};

use crate::logs::log_warning;
use crate::table::{Cell, Table};

const LEFT_SUFFIX: &str = "_x";
const RIGHT_SUFFIX: &str = "_y";

/// Join strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// Keep only rows with a match on both sides.
    Inner,
    /// Keep every left row; unmatched rows get missing right cells.
    Left,
}

/// Inner join on `left.left_on == right.right_on`.
pub fn inner_join(left: &Table, right: &Table, left_on: &str, right_on: &str) -> Table {
    merge(left, right, left_on, right_on, JoinKind::Inner)
}

/// Left outer join on a key column of the same name on both sides.
pub fn left_join(left: &Table, right: &Table, on: &str) -> Table {
    merge(left, right, on, on, JoinKind::Left)
}

/// Join two tables. Output follows left row order; each left row is
/// followed by its matches in right row order (cross product on duplicate
/// keys).
pub fn merge(left: &Table, right: &Table, left_on: &str, right_on: &str, how: JoinKind) -> Table {
    let left_key = left.column_index(left_on);
    let right_key = right.column_index(right_on);

    if left_key.is_none() {
        log_warning(format!("Join key '{}' missing from left table, no rows will match", left_on));
    }
    if right_key.is_none() {
        log_warning(format!("Join key '{}' missing from right table, no rows will match", right_on));
    }

    let shared_key = left_on == right_on && left_key.is_some() && right_key.is_some();
    let right_keep: Vec<usize> = (0..right.width())
        .filter(|&i| !(shared_key && Some(i) == right_key))
        .collect();

    let headers = join_headers(left, right, &right_keep, if shared_key { Some(left_on) } else { None });
    let mut out = Table::new(headers);

    let index = match right_key {
        Some(k) => build_index(right, k),
        None => HashMap::new(),
    };

    let mut matched_rows = 0usize;
    for row in left.rows() {
        let matches = left_key.and_then(|k| index.get(&row[k].as_deref()));

        match matches {
            Some(right_rows) => {
                matched_rows += 1;
                for &r in right_rows {
                    let right_row = &right.rows()[r];
                    let mut joined: Vec<Cell> = row.clone();
                    joined.extend(right_keep.iter().map(|&i| right_row[i].clone()));
                    out.push_row(joined);
                }
            }
            None if how == JoinKind::Left => {
                let mut joined: Vec<Cell> = row.clone();
                joined.extend(right_keep.iter().map(|_| None));
                out.push_row(joined);
            }
            None => {}
        }
    }

    if matched_rows == 0 && !left.is_empty() && left_key.is_some() && right_key.is_some() {
        log_warning(format!(
            "No '{}' value matched '{}' in {} left rows",
            left_on,
            right_on,
            left.len()
        ));
    }

    out
}

fn build_index(table: &Table, key: usize) -> HashMap<Option<&str>, Vec<usize>> {
    let mut index: HashMap<Option<&str>, Vec<usize>> = HashMap::new();
    for (i, row) in table.rows().iter().enumerate() {
        index.entry(row[key].as_deref()).or_default().push(i);
    }
    index
}

fn join_headers(left: &Table, right: &Table, right_keep: &[usize], shared_key: Option<&str>) -> Vec<String> {
    let left_names: HashSet<&str> = left.headers().iter().map(String::as_str).collect();
    let right_names: HashSet<&str> = right_keep
        .iter()
        .map(|&i| right.headers()[i].as_str())
        .collect();
    let clash = |name: &str| {
        Some(name) != shared_key && left_names.contains(name) && right_names.contains(name)
    };

    let mut headers: Vec<String> = left
        .headers()
        .iter()
        .map(|h| {
            if clash(h.as_str()) {
                format!("{}{}", h, LEFT_SUFFIX)
            } else {
                h.clone()
            }
        })
        .collect();

    headers.extend(right_keep.iter().map(|&i| {
        let h = &right.headers()[i];
        if clash(h.as_str()) {
            format!("{}{}", h, RIGHT_SUFFIX)
        } else {
            h.clone()
        }
    }));

    headers
}
