//! Parser for submitted workout text.
//!
//! A submission is a sequence of blocks separated by `;`. Each block holds
//! exactly five lines:
//!
//! ```text
//! #chest
//! -chest press
//! -5 setsX15 reps
//! -30 kg
//! -30 min
//! ```
//!
//! Whitespace around every line is ignored, and the `sets`, `x`, `reps`,
//! `kg` and `min` tokens match case-insensitively. Anything after a unit
//! token on the same line is ignored.
//!
//! Parsing is all-or-nothing: the first malformed block aborts the whole
//! submission and no drafts are returned.

use thiserror::Error;

use crate::types::EntryDraft;

/// Number of lines in a well-formed block.
const BLOCK_LINES: usize = 5;

/// A malformed block, located by its index among the non-empty blocks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("entry {}: {kind}", .block_index + 1)]
pub struct ParseError {
    pub block_index: usize,
    pub kind: ParseErrorKind,
}

/// What was wrong with a block.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("block must start with '#' followed by a category")]
    MissingCategoryMarker,

    #[error("expected 5 lines (category, name, sets/reps, weight, duration), found {lines}")]
    IncompleteBlock { lines: usize },

    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },

    /// `line` is 1-based within the block.
    #[error("line {line} must start with '-'")]
    MissingDash { line: usize },

    #[error("{field} is missing the '{unit}' unit")]
    MissingUnit {
        field: &'static str,
        unit: &'static str,
    },

    #[error("expected 'x' between sets and reps")]
    MissingSeparator,

    #[error("{field} is not a valid number: '{text}'")]
    BadNumericField { field: &'static str, text: String },
}

/// Parses workout text into drafts, preserving block order.
pub fn parse(raw: &str) -> Result<Vec<EntryDraft>, ParseError> {
    raw.split(';')
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .enumerate()
        .map(|(block_index, block)| {
            parse_block(block, block_index).map_err(|kind| ParseError { block_index, kind })
        })
        .collect()
}

/// The five trimmed lines of one block.
#[derive(Debug)]
struct RawBlock<'a> {
    category: &'a str,
    name: &'a str,
    volume: &'a str,
    weight: &'a str,
    duration: &'a str,
}

impl<'a> RawBlock<'a> {
    fn split(block: &'a str) -> Result<Self, ParseErrorKind> {
        if !block.starts_with('#') {
            return Err(ParseErrorKind::MissingCategoryMarker);
        }
        let lines: Vec<&str> = block.split('\n').map(str::trim).collect();
        let found = lines.len();
        let [category, name, volume, weight, duration] = <[&str; BLOCK_LINES]>::try_from(lines)
            .map_err(|_| ParseErrorKind::IncompleteBlock { lines: found })?;
        Ok(Self {
            category,
            name,
            volume,
            weight,
            duration,
        })
    }
}

fn parse_block(block: &str, block_index: usize) -> Result<EntryDraft, ParseErrorKind> {
    let raw = RawBlock::split(block)?;

    let marker_text = raw.category.strip_prefix('#').unwrap_or(raw.category);
    let category = non_empty(marker_text.trim(), "category")?;
    let workout_name = non_empty(descriptor(raw.name, 2)?, "workoutName")?;
    let (sets, reps) = parse_volume(descriptor(raw.volume, 3)?)?;
    let weight_kg = parse_measure(descriptor(raw.weight, 4)?, "weight", "kg")?;
    let duration_min = parse_measure(descriptor(raw.duration, 5)?, "duration", "min")?;

    Ok(EntryDraft {
        block_index,
        category: category.to_string(),
        workout_name: workout_name.to_string(),
        sets,
        reps,
        weight_kg,
        duration_min,
    })
}

fn non_empty<'a>(text: &'a str, field: &'static str) -> Result<&'a str, ParseErrorKind> {
    if text.is_empty() {
        Err(ParseErrorKind::EmptyField { field })
    } else {
        Ok(text)
    }
}

/// Strips the leading `-` of a descriptor line.
fn descriptor(line: &str, line_no: usize) -> Result<&str, ParseErrorKind> {
    line.strip_prefix('-')
        .map(str::trim)
        .ok_or(ParseErrorKind::MissingDash { line: line_no })
}

/// Parses `<int> setsX<int> reps`.
fn parse_volume(text: &str) -> Result<(i64, i64), ParseErrorKind> {
    let (sets_text, rest) = split_at_token(text, "sets", "sets")?;
    let rest = rest.trim_start();
    let rest = rest
        .strip_prefix('x')
        .or_else(|| rest.strip_prefix('X'))
        .ok_or(ParseErrorKind::MissingSeparator)?;
    let (reps_text, _) = split_at_token(rest, "reps", "reps")?;
    Ok((parse_int(sets_text, "sets")?, parse_int(reps_text, "reps")?))
}

/// Parses `<number> <unit>`.
fn parse_measure(text: &str, field: &'static str, unit: &'static str) -> Result<f64, ParseErrorKind> {
    let (value, _) = split_at_token(text, field, unit)?;
    value
        .parse::<f64>()
        .map_err(|_| ParseErrorKind::BadNumericField {
            field,
            text: value.to_string(),
        })
}

fn parse_int(text: &str, field: &'static str) -> Result<i64, ParseErrorKind> {
    text.parse::<i64>()
        .map_err(|_| ParseErrorKind::BadNumericField {
            field,
            text: text.to_string(),
        })
}

/// Splits at the first case-insensitive occurrence of `token`, returning the
/// trimmed text before it and the raw text after it.
fn split_at_token<'a>(
    text: &'a str,
    field: &'static str,
    token: &'static str,
) -> Result<(&'a str, &'a str), ParseErrorKind> {
    // ASCII lowercasing keeps byte offsets aligned with `text`.
    let at = text
        .to_ascii_lowercase()
        .find(token)
        .ok_or(ParseErrorKind::MissingUnit { field, unit: token })?;
    Ok((text[..at].trim(), &text[at + token.len()..]))
}
