//! Media-query emitter: breakpoints + per-element overrides → CSS text.
//!
//! Produces the `@media` blocks for static export. The unconditional base
//! rules are the export pipeline's job; only non-default breakpoints with
//! a bounded range contribute blocks here. Output is deterministic: blocks
//! follow the matching order (min-width descending) and declarations are
//! sorted by property key.

use crate::model::{Breakpoint, BreakpointOverride, Dimension, ResponsiveStyles, StyleValue};
use crate::resolve::sort_for_matching;
use std::fmt::Write;

/// CSS properties whose numeric values take no `px` suffix.
const UNITLESS: &[&str] = &[
    "flexGrow",
    "flexShrink",
    "fontWeight",
    "lineHeight",
    "opacity",
    "order",
    "zIndex",
    "zoom",
];

/// Emit one `@media` block per bounded, non-default breakpoint for which at
/// least one element carries a non-empty override. `elements` pairs a CSS
/// selector with that element's override map; rule order inside a block
/// follows the slice order.
#[must_use]
pub fn generate_media_queries(
    breakpoints: &[Breakpoint],
    elements: &[(&str, &ResponsiveStyles)],
) -> String {
    let mut out = String::with_capacity(1024);

    for bp in sort_for_matching(breakpoints) {
        // The default breakpoint's styles are the unconditional base rule,
        // even if a stray override entry names it.
        if bp.is_default {
            continue;
        }

        let condition = media_condition(bp);
        if condition.is_empty() {
            continue;
        }

        let rules: Vec<(&str, &BreakpointOverride)> = elements
            .iter()
            .filter_map(|(selector, responsive)| {
                responsive
                    .override_for(bp.id)
                    .filter(|patch| !patch.is_empty())
                    .map(|patch| (*selector, patch))
            })
            .collect();
        if rules.is_empty() {
            continue;
        }

        let _ = writeln!(out, "/* {} */", bp.name);
        let _ = writeln!(out, "@media {condition} {{");
        for (selector, patch) in rules {
            emit_rule(&mut out, selector, patch);
        }
        out.push_str("}\n\n");
    }

    out
}

/// Build the condition list from whichever bounds are present, joined
/// with `and`.
fn media_condition(bp: &Breakpoint) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(2);
    if let Some(min) = bp.min_width {
        parts.push(format!("(min-width: {}px)", format_num(min)));
    }
    if let Some(max) = bp.max_width {
        parts.push(format!("(max-width: {}px)", format_num(max)));
    }
    parts.join(" and ")
}

fn emit_rule(out: &mut String, selector: &str, patch: &BreakpointOverride) {
    writeln!(out, "  {selector} {{").unwrap();

    // Style keys sorted for stable output
    let mut keys: Vec<&String> = patch.styles.keys().collect();
    keys.sort();
    for key in keys {
        writeln!(
            out,
            "    {}: {};",
            css_property_name(key),
            css_value(key, &patch.styles[key])
        )
        .unwrap();
    }

    if let Some(size) = patch.size {
        writeln!(out, "    width: {};", css_dimension(size.width)).unwrap();
        writeln!(out, "    height: {};", css_dimension(size.height)).unwrap();
    }
    if let Some(position) = patch.position {
        writeln!(out, "    left: {}px;", format_num(position.x)).unwrap();
        writeln!(out, "    top: {}px;", format_num(position.y)).unwrap();
    }
    if patch.visible == Some(false) {
        out.push_str("    display: none;\n");
    }

    out.push_str("  }\n");
}

/// camelCase style key → kebab-case CSS property (`fontSize` → `font-size`).
fn css_property_name(key: &str) -> String {
    let mut prop = String::with_capacity(key.len() + 2);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            prop.push('-');
            prop.push(c.to_ascii_lowercase());
        } else {
            prop.push(c);
        }
    }
    prop
}

/// Numbers are pixel lengths unless the property is unitless; text values
/// pass through as written.
fn css_value(key: &str, value: &StyleValue) -> String {
    match value {
        StyleValue::Text(text) => text.clone(),
        StyleValue::Number(n) if UNITLESS.contains(&key) => format_num64(*n),
        StyleValue::Number(n) => format!("{}px", format_num64(*n)),
    }
}

fn css_dimension(dimension: Dimension) -> String {
    match dimension {
        Dimension::Px(v) => format!("{}px", format_num(v)),
        Dimension::Auto => "auto".to_string(),
        Dimension::Fill => "100%".to_string(),
    }
}

fn format_num(n: f32) -> String {
    if n == n.floor() {
        format!("{}", n as i32)
    } else {
        format!("{n:.2}")
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

fn format_num64(n: f64) -> String {
    if n == n.floor() {
        format!("{}", n as i64)
    } else {
        format!("{n:.2}")
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}
