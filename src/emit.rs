//! YAML output for YAML 1.1 readers.
//!
//! The site renderer reads `_config.yml` with a YAML 1.1 parser, where plain
//! `NO`, `on`, `~` and `09:00:00` are a boolean, a boolean, null and an
//! integer. serde_yaml writes YAML 1.2 and leaves those strings unquoted, so
//! a workshop in Norway (`country: "NO"`) would reach the templates as
//! `false`. This emitter writes block-style YAML itself and quotes every
//! string a 1.1 parser would resolve to something else.
//!
//! ```text
//! title: Example Carpentry
//! workshops:
//! - slug: 2020-03-02-oslo
//!   country: 'NO'
//! blog_recent: []
//! ```
//!
//! Other scalars are rendered by serde_yaml one at a time, so its own
//! quoting rules still apply. Strings that would span several lines are
//! written double-quoted with escapes.

use regex::Regex;
use serde::ser::Error as _;
use serde_yaml::{Mapping, Value};
use std::fmt::Write as _;
use std::sync::LazyLock;

/// Plain scalars a YAML 1.1 parser resolves to bool, null, int or float.
static YAML11_NON_STRING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)^(?:
            y|Y|yes|Yes|YES|n|N|no|No|NO
          | true|True|TRUE|false|False|FALSE
          | on|On|ON|off|Off|OFF
          | ~|null|Null|NULL
          | [-+]?0b[01_]+
          | [-+]?0[0-7_]+
          | [-+]?(?:0|[1-9][0-9_,]*)
          | [-+]?0x[0-9a-fA-F_]+
          | [-+]?[0-9][0-9_]*(?::[0-5]?[0-9])+(?:\.[0-9_]*)?
          | [-+]?(?:[0-9][0-9_]*)?\.[0-9.]*(?:[eE][-+][0-9]+)?
          | [-+]?\.(?:inf|Inf|INF)
          | \.(?:nan|NaN|NAN)
        )$",
    )
    .expect("YAML 1.1 scalar pattern must compile")
});

/// Serialize `value` as a block-style YAML document.
pub fn to_yaml_string(value: &Value) -> Result<String, serde_yaml::Error> {
    let mut out = String::new();
    match untag(value) {
        Value::Mapping(map) if !map.is_empty() => write_mapping(&mut out, map, 0)?,
        Value::Sequence(seq) if !seq.is_empty() => write_sequence(&mut out, seq, 0)?,
        other => {
            out.push_str(&inline(other)?);
            out.push('\n');
        }
    }
    Ok(out)
}

fn pad(out: &mut String, indent: usize) {
    out.extend(std::iter::repeat_n(' ', indent));
}

fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

fn write_mapping(out: &mut String, map: &Mapping, indent: usize) -> Result<(), serde_yaml::Error> {
    for (key, value) in map {
        pad(out, indent);
        out.push_str(&key_scalar(key)?);
        out.push(':');
        // Sequences under a key sit at the key's own indent.
        write_child(out, value, indent, indent + 2)?;
    }
    Ok(())
}

fn write_sequence(out: &mut String, seq: &[Value], indent: usize) -> Result<(), serde_yaml::Error> {
    for item in seq {
        let nested = indent + 2;
        let mut block = String::new();
        match untag(item) {
            Value::Mapping(map) if !map.is_empty() => write_mapping(&mut block, map, nested)?,
            Value::Sequence(inner) if !inner.is_empty() => {
                write_sequence(&mut block, inner, nested)?
            }
            other => {
                pad(out, indent);
                out.push_str("- ");
                out.push_str(&inline(other)?);
                out.push('\n');
                continue;
            }
        }
        // The first line of the nested block shares the dash's line.
        pad(out, indent);
        out.push_str("- ");
        out.push_str(&block[nested..]);
    }
    Ok(())
}

/// Everything after `key:`.
fn write_child(
    out: &mut String,
    value: &Value,
    seq_indent: usize,
    map_indent: usize,
) -> Result<(), serde_yaml::Error> {
    match untag(value) {
        Value::Mapping(map) if !map.is_empty() => {
            out.push('\n');
            write_mapping(out, map, map_indent)
        }
        Value::Sequence(seq) if !seq.is_empty() => {
            out.push('\n');
            write_sequence(out, seq, seq_indent)
        }
        other => {
            out.push(' ');
            out.push_str(&inline(other)?);
            out.push('\n');
            Ok(())
        }
    }
}

fn key_scalar(key: &Value) -> Result<String, serde_yaml::Error> {
    match untag(key) {
        Value::Mapping(_) | Value::Sequence(_) => Err(serde_yaml::Error::custom(
            "mapping keys must be scalars",
        )),
        other => inline(other),
    }
}

/// A value that fits on the current line.
fn inline(value: &Value) -> Result<String, serde_yaml::Error> {
    Ok(match untag(value) {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => string_scalar(s)?,
        Value::Sequence(seq) if seq.is_empty() => "[]".to_string(),
        Value::Mapping(map) if map.is_empty() => "{}".to_string(),
        _ => return Err(serde_yaml::Error::custom("nested collection in inline position")),
    })
}

fn string_scalar(s: &str) -> Result<String, serde_yaml::Error> {
    if s.is_empty() || YAML11_NON_STRING.is_match(s) {
        // Every pattern match is free of quote characters.
        return Ok(format!("'{s}'"));
    }
    let emitted = serde_yaml::to_string(s)?;
    let line = emitted.strip_suffix('\n').unwrap_or(&emitted);
    if line.contains('\n') || line.starts_with('|') || line.starts_with('>') {
        return Ok(double_quoted(s));
    }
    Ok(line.to_string())
}

fn double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
