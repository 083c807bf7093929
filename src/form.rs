use anyhow::Result;
use std::io::{BufRead, Write};

use crate::common::FormInput;

/// Reads one line. `None` means the input was closed.
fn read_field<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    label: &str,
    previous: &str,
) -> Result<Option<String>> {
    if previous.is_empty() {
        write!(writer, "{}: ", label)?;
    } else {
        write!(writer, "{} [{}]: ", label, previous)?;
    }
    writer.flush()?;

    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    let value = line.trim_end_matches(['\r', '\n']);
    if value.is_empty() {
        Ok(Some(previous.to_string()))
    } else {
        Ok(Some(value.to_string()))
    }
}

/// Prompts for every form field. An empty answer keeps the previous value,
/// so a rejected form can be corrected without retyping it.
pub fn prompt_form<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    previous: &FormInput,
) -> Result<Option<FormInput>> {
    writeln!(writer, "UTM parameters (* = required)")?;

    let fields = [
        ("Base URL*", &previous.base_url),
        ("utm_source*", &previous.source),
        ("utm_medium*", &previous.medium),
        ("utm_campaign*", &previous.campaign),
        ("utm_term", &previous.term),
        ("utm_content", &previous.content),
    ];

    let mut answers = Vec::with_capacity(fields.len());
    for (label, prev) in fields {
        match read_field(reader, writer, label, prev)? {
            Some(value) => answers.push(value),
            None => return Ok(None),
        }
    }

    let mut answers = answers.into_iter();
    let mut next = || answers.next().unwrap_or_default();
    Ok(Some(FormInput {
        base_url: next(),
        source: next(),
        medium: next(),
        campaign: next(),
        term: next(),
        content: next(),
    }))
}

/// Asks a yes/no question, defaulting to yes.
pub fn confirm<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    question: &str,
) -> Result<bool> {
    write!(writer, "{} [Y/n]: ", question)?;
    writer.flush()?;

    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(false);
    }
    let answer = line.trim().to_lowercase();
    Ok(answer.is_empty() || answer == "y" || answer == "yes")
}
