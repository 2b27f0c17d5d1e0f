//! Human-readable usage text and provenance reports.

use std::io::{self, Write};

use crate::set::{Flag, FlagSet};
use crate::types::Source;

/// Split `flag`'s usage into a value placeholder and the usage text.
///
/// The first back-quoted word names the placeholder and loses its quotes:
/// "a \`name\` to show" gives `("name", "a name to show")`. Without one, the
/// placeholder is `value`, except for boolean flags and flags with no usage
/// text, which get none.
pub fn unquote_usage(flag: &Flag) -> (String, String) {
    let usage = flag.usage();
    if let Some(start) = usage.find('`') {
        let rest = &usage[start + 1..];
        if let Some(len) = rest.find('`') {
            let name = &rest[..len];
            let text = format!("{}{}{}", &usage[..start], name, &rest[len + 1..]);
            return (name.to_string(), text);
        }
    }

    let name = if flag.is_bool_flag() || usage.is_empty() {
        ""
    } else {
        "value"
    };
    (name.to_string(), usage.to_string())
}

/// One usage entry per flag, in lexicographical order.
pub fn write_defaults(set: &FlagSet, w: &mut dyn Write) -> io::Result<()> {
    for flag in set.flags() {
        let mut line = format!("  -{}", flag.name());
        let (name, usage) = unquote_usage(flag);
        if !name.is_empty() {
            line.push(' ');
            line.push_str(&name);
        }
        // Single-letter flags without a placeholder keep their usage on the same line.
        if line.len() <= 4 {
            line.push('\t');
        } else {
            line.push_str("\n    \t");
        }
        line.push_str(&usage.replace('\n', "\n    \t"));

        let default = flag.default_value();
        if default.is_empty() {
            line.push_str(" (default \"\")");
        } else {
            line.push_str(&format!(" (default {default})"));
        }
        writeln!(w, "{line}")?;
    }
    Ok(())
}

pub fn default_usage(set: &FlagSet, w: &mut dyn Write) -> io::Result<()> {
    if set.name().is_empty() {
        writeln!(w, "Usage:")?;
    } else {
        writeln!(w, "Usage of {}:", set.name())?;
    }
    write_defaults(set, w)
}

/// Every flag's current value followed by its source, aligned in one column.
pub fn write_values(set: &FlagSet, w: &mut dyn Write) -> io::Result<()> {
    if set.name().is_empty() {
        writeln!(w, "Current configuration:")?;
    } else {
        writeln!(w, "Current configuration of {}:", set.name())?;
    }

    let rows: Vec<(String, String)> = set
        .flags()
        .map(|flag| {
            let prefix = format!("  -{} {}", flag.name(), flag.value());
            let source = set
                .provenance(flag.name())
                .cloned()
                .unwrap_or(Source::DEFAULT);
            (prefix, source.to_string())
        })
        .collect();
    let width = rows.iter().map(|(p, _)| p.chars().count()).max().unwrap_or(0);

    for (prefix, source) in rows {
        writeln!(w, "{prefix:<width$} ({source})")?;
    }
    Ok(())
}
