//! Nom-based protocol line parser.
//!
//! This module provides zero-copy parsing of protocol lines using the nom
//! parser combinator library. Tokens are separated by single spaces; a
//! token starting with `:` after the command begins the trailing parameter
//! and absorbs the rest of the line.

use nom::{
    bytes::complete::take_till,
    character::complete::char,
    combinator::opt,
    error::{context, VerboseError},
    sequence::{preceded, terminated},
    IResult,
};

type ParseResult<I, O> = IResult<I, O, VerboseError<I>>;

/// One space-delimited token. Never fails; may be empty.
fn token(input: &str) -> ParseResult<&str, &str> {
    take_till(|c: char| c == ' ')(input)
}

/// A single separator space, if any.
fn separator(input: &str) -> ParseResult<&str, Option<char>> {
    opt(char(' '))(input)
}

/// Parse the tag block (the token after `@`).
fn parse_tags(input: &str) -> ParseResult<&str, &str> {
    context("parsing tag block", preceded(char('@'), token))(input)
}

/// Parse the source (the token after `:`).
fn parse_source(input: &str) -> ParseResult<&str, &str> {
    context("parsing source", preceded(char(':'), token))(input)
}

/// Parse the channel (the token after `#`).
fn parse_channel(input: &str) -> ParseResult<&str, &str> {
    context("parsing channel", preceded(char('#'), token))(input)
}

/// Parse a complete line into its components.
///
/// Line format:
/// ```text
/// [@tags] [:source] <command> [#channel] [params...] [:trailing]
/// ```
pub fn parse_line(input: &str) -> ParseResult<&str, ParsedLine<'_>> {
    let (input, tags) = opt(terminated(parse_tags, separator))(input)?;
    let (input, source) = opt(terminated(parse_source, separator))(input)?;
    let (input, command) = context("parsing command", terminated(token, separator))(input)?;
    // A target without a leading `#` stays in params rather than being dropped.
    let (input, channel) = opt(terminated(parse_channel, separator))(input)?;

    let mut params: Vec<&str> = Vec::new();
    let mut rest = input;

    while !rest.is_empty() {
        if let Some(trailing) = rest.strip_prefix(':') {
            params.push(trailing);
            rest = "";
            break;
        }

        match rest.split_once(' ') {
            Some((param, tail)) => {
                params.push(param);
                rest = tail;
            }
            None => {
                params.push(rest);
                rest = "";
            }
        }
    }

    Ok((
        rest,
        ParsedLine {
            tags,
            source,
            command,
            channel,
            params,
        },
    ))
}

/// A parsed line with borrowed string slices.
///
/// Intermediate representation produced by the nom parser; holds references
/// into the original input.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedLine<'a> {
    /// Raw tag block (without the leading `@`), if present.
    pub tags: Option<&'a str>,
    /// Raw source (without the leading `:`), if present.
    pub source: Option<&'a str>,
    /// The command verb. Empty when the line ended early.
    pub command: &'a str,
    /// Channel name (without the leading `#`), if present.
    pub channel: Option<&'a str>,
    /// Remaining parameters, trailing parameter last.
    pub params: Vec<&'a str>,
}

impl<'a> ParsedLine<'a> {
    /// Parse a line, stripping any trailing CR/LF first.
    ///
    /// Total: a line too short for some component yields that component as
    /// absent or empty instead of an error.
    pub fn parse(input: &'a str) -> Self {
        let trimmed = input.trim_end_matches(['\r', '\n']);
        match parse_line(trimmed) {
            Ok((_remaining, line)) => line,
            Err(_) => ParsedLine::default(),
        }
    }
}
