use std::io::{self, BufRead};

use crate::compat::{COMPAT_MODES_ARG, MAX_ENCODED_LEN};

use super::{argument::Argument, list::ArgumentList};

/// Parses config text into an argument list.
///
/// Lines look like `[$]key[: value]  # comment`. A `#` as the first
/// non-blank character comments out the whole line and a leading `$` marks
/// the argument disabled. Malformed lines are skipped; only read failures
/// are reported.
pub fn parse_options<R: BufRead>(mut reader: R) -> io::Result<ArgumentList> {
    let mut list = ArgumentList::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        if let Some(arg) = parse_line(&line) {
            list.append(arg);
        }
    }
    Ok(list)
}

pub(crate) fn parse_line(line: &str) -> Option<Argument> {
    let terminated = line.ends_with('\n');

    let rest = line.trim_start();
    if rest.starts_with('#') {
        return None;
    }
    let (disabled, rest) = match rest.strip_prefix('$') {
        Some(rest) => (true, rest),
        None => (false, rest),
    };

    let (key, tail) = rest.split_once(':')?;
    let name = key.trim();
    if name.is_empty() {
        return None;
    }
    // Blank value running into EOF
    if !terminated && tail.trim().is_empty() {
        return None;
    }

    let tail = tail.trim_start();
    let end = tail.find(|c| matches!(c, '#' | '\r' | '\n')).unwrap_or(tail.len());
    let raw_value = tail[..end].trim_end();

    // The compat value is rewritten in place by the editor, keep room for every mode.
    let mut value = if name == COMPAT_MODES_ARG {
        String::with_capacity(raw_value.len().max(MAX_ENCODED_LEN + 1))
    } else {
        String::with_capacity(raw_value.len())
    };
    value.push_str(raw_value);

    Some(Argument {
        name: name.to_owned(),
        value,
        disabled,
        global: false,
    })
}
