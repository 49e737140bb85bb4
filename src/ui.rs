// Console helpers shared by the managers: validated field prompts built on
// `dialoguer`, index prompts with a 0-to-cancel convention, and a spinner
// for the slow calls.

use std::time::Duration;

use dialoguer::{Input, Password};
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::{Error, Result};

/// Prompt until `parse` accepts the input. Validation failures are printed
/// and the prompt repeats; any other error kind (and a closed terminal)
/// propagates and aborts the operation.
pub fn read_value<T>(
    prompt: &str,
    parse: impl Fn(&str) -> Result<T>,
) -> anyhow::Result<T> {
    loop {
        let line: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        match parse(line.trim()) {
            Ok(value) => return Ok(value),
            Err(e) if e.is_validation() => println!("{e}"),
            Err(e) => return Err(e.into()),
        }
    }
}

pub fn read_password(prompt: &str) -> anyhow::Result<String> {
    Ok(Password::new().with_prompt(prompt).interact()?)
}

/// Typed index in `0..=count`. Anything else is a validation error, so the
/// surrounding prompt retries instead of aborting the operation.
fn parse_index(value: &str, count: usize) -> Result<usize> {
    let n: usize = value
        .parse()
        .map_err(|_| Error::validation("index", format!("must be a number, got {value:?}")))?;
    if n > count {
        return Err(Error::validation(
            "index",
            format!("must be between 0 and {count}, got {n}"),
        ));
    }
    Ok(n)
}

/// Read a 1-based index up to `count`, with 0 meaning cancel. Returns the
/// 0-based index, or `None` on cancel.
pub fn read_index(prompt: &str, count: usize) -> anyhow::Result<Option<usize>> {
    let chosen = read_value(prompt, |s| parse_index(s, count))?;
    Ok(chosen.checked_sub(1))
}

pub fn parse_remote_id(field: &'static str, s: &str) -> Result<u64> {
    let id: u64 = s
        .parse()
        .map_err(|_| Error::validation(field, format!("must be a positive number, got {s:?}")))?;
    if id == 0 {
        return Err(Error::validation(field, "must be at least 1, got 0"));
    }
    Ok(id)
}

/// First `max` characters of `s`, for fixed-width table cells.
pub fn clip(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Spinner shown while a blocking call runs. Call `finish_and_clear` when
/// done.
pub fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    bar.set_message(message.to_owned());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
