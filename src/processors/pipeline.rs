// Copyright © 2026 Quillpost. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Rewrite Pipeline
//!
//! An ordered list of named regex substitution [`Stage`]s. Each stage
//! scans the whole output of the previous one; later stages may rely on
//! syntax that earlier stages have already consumed, so the order of the
//! list is part of its contract.
//!
//! The `regex` crate has no lookaround. Stages that need it use a
//! [`Rewrite::Guarded`] function that sees the match together with the
//! full input and may decline it. A declined match is kept verbatim and
//! scanning resumes one character after its start, which gives the same
//! result as a lookbehind/lookahead assertion failing at that position.

use log::trace;
use regex::{Captures, Regex};

use crate::core::error::{ProcessingError, Result};

/// Computes a replacement from a match and the full stage input.
/// Returning `None` declines the match.
pub type GuardFn = fn(&Captures<'_>, &str) -> Option<String>;

/// How a stage turns a match into replacement text.
#[derive(Debug, Clone, Copy)]
pub enum Rewrite {
    /// A capture-group template expanded with `${N}` references.
    Template(&'static str),
    /// A replacement computed from the match and its surroundings.
    Guarded(GuardFn),
}

/// A named (pattern, rewrite) pair.
#[derive(Debug, Clone)]
pub struct Stage {
    name: &'static str,
    pattern: Regex,
    rewrite: Rewrite,
}

impl Stage {
    /// Compiles `pattern` into a stage.
    pub fn new(
        name: &'static str,
        pattern: &str,
        rewrite: Rewrite,
    ) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|source| {
            ProcessingError::Pattern {
                stage: name.to_string(),
                source,
            }
        })?;
        Ok(Self {
            name,
            pattern,
            rewrite,
        })
    }

    /// The stage name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Applies the stage to every non-overlapping match, left to right.
    ///
    /// Returns the rewritten text and the number of matches replaced.
    pub fn apply(&self, input: &str) -> (String, usize) {
        let mut output = String::with_capacity(input.len());
        let mut copied = 0;
        let mut at = 0;
        let mut count = 0;

        while at <= input.len() {
            let Some(caps) = self.pattern.captures_at(input, at) else {
                break;
            };
            let Some(whole) = caps.get(0) else {
                break;
            };

            let replacement = match self.rewrite {
                Rewrite::Template(template) => {
                    let mut expanded = String::new();
                    caps.expand(template, &mut expanded);
                    Some(expanded)
                }
                Rewrite::Guarded(guard) => guard(&caps, input),
            };

            match replacement {
                Some(text) => {
                    output.push_str(&input[copied..whole.start()]);
                    output.push_str(&text);
                    copied = whole.end();
                    count += 1;
                    at = if whole.is_empty() {
                        next_boundary(input, whole.end())
                    } else {
                        whole.end()
                    };
                }
                None => at = next_boundary(input, whole.start()),
            }
        }

        output.push_str(&input[copied..]);
        (output, count)
    }
}

/// Byte offset of the character after `pos`, or past the end.
fn next_boundary(input: &str, pos: usize) -> usize {
    input[pos..]
        .chars()
        .next()
        .map_or(input.len() + 1, |c| pos + c.len_utf8())
}

/// The character immediately before byte offset `pos`.
pub fn char_before(input: &str, pos: usize) -> Option<char> {
    input[..pos].chars().next_back()
}

/// The rest of the line starting at byte offset `pos`.
pub fn rest_of_line(input: &str, pos: usize) -> &str {
    let rest = &input[pos..];
    rest.find(&['\n', '\r'][..]).map_or(rest, |end| &rest[..end])
}

/// An ordered sequence of stages.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Creates a pipeline from stages in execution order.
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(Stage::name).collect()
    }

    /// Runs every stage in order.
    pub fn run(&self, input: &str) -> String {
        run_stages(&self.stages, input)
    }

    /// Runs the stages up to and including `last`.
    ///
    /// Returns `None` when no stage has that name.
    pub fn run_until(&self, last: &str, input: &str) -> Option<String> {
        let end = self.stages.iter().position(|s| s.name == last)?;
        Some(run_stages(&self.stages[..=end], input))
    }
}

fn run_stages(stages: &[Stage], input: &str) -> String {
    let mut text = input.to_string();
    for stage in stages {
        let (rewritten, count) = stage.apply(&text);
        if count > 0 {
            trace!("stage `{}` rewrote {} match(es)", stage.name, count);
        }
        text = rewritten;
    }
    text
}
