// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Interactive collection of query values.

use std::io::{BufRead, Write};

use anyhow::bail;

/// Parse a plot dimension: a positive number of meters.
pub fn parse_dimension(text: &str) -> Result<f64, String> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| "Please enter a valid number!".to_string())?;
    if !value.is_finite() || value <= 0.0 {
        return Err("Width and height must be positive numbers!".into());
    }
    Ok(value)
}

/// Parse a room count: a non-negative integer.
pub fn parse_count(text: &str) -> Result<u32, String> {
    let value: i64 = text
        .trim()
        .parse()
        .map_err(|_| "Please enter a valid integer!".to_string())?;
    if value < 0 {
        return Err("Please enter a non-negative number!".into());
    }
    u32::try_from(value).map_err(|_| format!("{} rooms is too many!", value))
}

/// Line-oriented prompter over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, text: &str) -> anyhow::Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// Ask until `parse` accepts the answer. Invalid answers re-prompt without
    /// limit; only end of input ends the loop early.
    pub fn ask<T>(
        &mut self,
        prompt: &str,
        parse: impl Fn(&str) -> Result<T, String>,
    ) -> anyhow::Result<T> {
        loop {
            write!(self.output, "{}", prompt)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                bail!(
                    "input closed while waiting for {}",
                    prompt.trim().trim_end_matches(':')
                );
            }

            match parse(&line) {
                Ok(value) => return Ok(value),
                Err(message) => writeln!(self.output, "{}", message)?,
            }
        }
    }
}
