// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! What a node looks like: label lines, tooltip, and fill.

use alloc::{borrow::ToOwned, format, string::String, vec, vec::Vec};

use canopy_display::ExpansionState;
use canopy_store::{NodeKind, StoreRecord};

/// Circle fill of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Fill {
    /// The node hides loaded children; clicking shows them again.
    Collapsed,
    /// Everything else.
    Plain,
}

impl Fill {
    /// Fill for a node in `state`.
    pub fn for_state(state: ExpansionState) -> Self {
        match state {
            ExpansionState::Collapsed => Self::Collapsed,
            ExpansionState::Expanded | ExpansionState::Unloaded => Self::Plain,
        }
    }

    /// CSS color.
    pub fn css(self) -> &'static str {
        match self {
            Self::Collapsed => "lightsteelblue",
            Self::Plain => "#fff",
        }
    }
}

/// Text and styling of a rendered node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeVisual {
    /// Label lines, top to bottom: tag, visit count, and for actions the value.
    pub lines: Vec<String>,
    /// Hover text.
    pub tooltip: String,
    /// Circle fill.
    pub fill: Fill,
}

impl NodeVisual {
    /// Visual for `record` shown in `state`.
    pub fn new(record: &StoreRecord, state: ExpansionState) -> Self {
        let mut lines = vec![record.tag.clone(), format!("N:{}", record.visit_count)];
        if let NodeKind::Action { value } = record.kind {
            lines.push(format!("Q:{}", to_precision(value, 4)));
        }
        Self {
            lines,
            tooltip: record.tooltip_text(),
            fill: Fill::for_state(state),
        }
    }
}

/// Format `value` with `digits` significant digits.
///
/// Uses fixed notation for exponents in `-6..digits` and exponential notation
/// (`1.235e+7`) otherwise, padding with trailing zeros to exactly `digits` significant digits.
pub fn to_precision(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    let digits = digits.max(1);
    // Rust rounds once here; the exponent it reports already accounts for carry (9.9996 → 1.000e1).
    let sci = format!("{:.*e}", digits - 1, value);
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i64 = exponent.parse().unwrap_or(0);
    let max_fixed = i64::try_from(digits).unwrap_or(i64::MAX);
    if exponent < -6 || exponent >= max_fixed {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{}", exponent.unsigned_abs());
    }
    let decimals = usize::try_from(max_fixed - 1 - exponent).unwrap_or(0);
    format!("{value:.decimals$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precision_padding_and_notation() {
        assert_eq!(to_precision(1.2, 4), "1.200");
        assert_eq!(to_precision(-0.4, 4), "-0.4000");
        assert_eq!(to_precision(0.0, 4), "0.000");
        assert_eq!(to_precision(123.456, 4), "123.5");
        assert_eq!(to_precision(12_345.6, 4), "1.235e+4");
        assert_eq!(to_precision(0.000_012_346, 4), "0.00001235");
        assert_eq!(to_precision(1.5e-7, 4), "1.500e-7");
        assert_eq!(to_precision(9.9996, 4), "10.00");
        assert_eq!(to_precision(f64::NAN, 4), "NaN");
    }

    #[test]
    fn action_label_has_three_lines() {
        let rec = StoreRecord::action("a", "left", 3, 1.2);
        let v = NodeVisual::new(&rec, ExpansionState::Unloaded);
        assert_eq!(v.lines, ["left", "N:3", "Q:1.200"]);
        assert_eq!(v.tooltip, "left\nid: a\nN: 3\nQ: 1.2");
        assert_eq!(v.fill, Fill::Plain);
    }

    #[test]
    fn decision_label_and_collapsed_fill() {
        let rec = StoreRecord::decision("s", "state", 5).with_tooltip("custom");
        let v = NodeVisual::new(&rec, ExpansionState::Collapsed);
        assert_eq!(v.lines, ["state", "N:5"]);
        assert_eq!(v.tooltip, "custom");
        assert_eq!(v.fill.css(), "lightsteelblue");
    }
}
