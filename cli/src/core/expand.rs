//! # shvar Expansion Engine
//!
//! File: cli/src/core/expand.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module implements shell-style variable substitution. It scans a
//! template once, left to right, and replaces every variable reference with
//! a value obtained from a caller-supplied [`Scope`].
//!
//! Recognised reference forms:
//! - `$NAME` (POSIX): bare name of `[A-Za-z0-9_]` characters, no operators.
//! - `${NAME}` and `${NAME<op>operand}` (POSIX), where `<op>` is one of
//!   `-`, `:-`, `=`, `:=`, `+`, `:+`, `?`, `:?`.
//! - `%NAME%` (Windows): bare name between two percent signs, no operators.
//!
//! A `$` or `%` that does not start a valid reference is copied through
//! unchanged. Only an unterminated `${`, an unknown operator, or a triggered
//! `?`/`:?` reference fail.
//!
//! ## Architecture
//!
//! - `ExpandOptions`: which of the two syntaxes are recognised.
//! - `Scope`: the lookup/assign capability. Errors raised by a scope are
//!   returned to the caller untouched.
//! - `FnScope`: a `Scope` built from two closures.
//! - `expand` / `expand_with`: entry points.
//!
//! Operand text is expanded recursively and lazily: only when the operator
//! decides the operand is needed. Inside an operand `\}` and `\$` stand for
//! a literal `}` and `$`; any other backslash is ordinary text.
//!
//! ## Examples
//!
//! ```rust,ignore
//! use crate::common::store::{MemoryStore, StoreScope, VarStore};
//! use crate::core::expand::{self, ExpandOptions};
//!
//! let mut store = MemoryStore::new();
//! store.set("USER", "christi")?;
//! let mut scope = StoreScope::new(&mut store);
//! let text = expand::expand("home=/home/${USER}, shell=${SHELL:=/bin/sh}", &mut scope, &ExpandOptions::posix())?;
//! assert_eq!(text, "home=/home/christi, shell=/bin/sh");
//! assert_eq!(store.get("SHELL")?, Some("/bin/sh".to_string()));
//! ```
//!
use crate::common::platform::Platform;
use crate::core::error::ExpansionError;
use std::marker::PhantomData;
use tracing::{debug, trace};

/// Selects the reference syntaxes the scanner recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandOptions {
    /// `$NAME` and `${...}`.
    pub posix: bool,
    /// `%NAME%`.
    pub windows: bool,
}

impl ExpandOptions {
    pub fn posix() -> Self {
        Self {
            posix: true,
            windows: false,
        }
    }

    pub fn windows() -> Self {
        Self {
            posix: false,
            windows: true,
        }
    }

    pub fn both() -> Self {
        Self {
            posix: true,
            windows: true,
        }
    }

    /// POSIX syntax everywhere, plus `%NAME%` on Windows hosts.
    pub fn for_platform(platform: Platform) -> Self {
        Self {
            posix: true,
            windows: platform.is_windows(),
        }
    }
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self::for_platform(Platform::current())
    }
}

/// Variable lookup and assignment as seen by the expander.
pub trait Scope {
    /// Error raised by the scope itself. Engine failures convert into it.
    type Error: From<ExpansionError>;

    /// Returns `None` when the variable is unset.
    fn lookup(&mut self, name: &str) -> Result<Option<String>, Self::Error>;

    /// Called by `=` / `:=` references to persist a default.
    fn assign(&mut self, name: &str, value: &str) -> Result<(), Self::Error>;
}

/// A [`Scope`] assembled from a lookup closure and an assign closure.
pub struct FnScope<L, A, E> {
    lookup: L,
    assign: A,
    _error: PhantomData<fn() -> E>,
}

impl<L, A, E> FnScope<L, A, E>
where
    L: FnMut(&str) -> Result<Option<String>, E>,
    A: FnMut(&str, &str) -> Result<(), E>,
    E: From<ExpansionError>,
{
    pub fn new(lookup: L, assign: A) -> Self {
        Self {
            lookup,
            assign,
            _error: PhantomData,
        }
    }
}

impl<L, A, E> Scope for FnScope<L, A, E>
where
    L: FnMut(&str) -> Result<Option<String>, E>,
    A: FnMut(&str, &str) -> Result<(), E>,
    E: From<ExpansionError>,
{
    type Error = E;

    fn lookup(&mut self, name: &str) -> Result<Option<String>, E> {
        (self.lookup)(name)
    }

    fn assign(&mut self, name: &str, value: &str) -> Result<(), E> {
        (self.assign)(name, value)
    }
}

/// Modifier between the name and the operand of a `${...}` reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Default,
    DefaultEmpty,
    Assign,
    AssignEmpty,
    Alternate,
    AlternateEmpty,
    Require,
    RequireEmpty,
}

impl Operator {
    /// Parses the operator at the start of `rest`, returning it with its byte length.
    fn parse(rest: &str) -> Option<(Operator, usize)> {
        let bytes = rest.as_bytes();
        let colon = bytes.first() == Some(&b':');
        let at = usize::from(colon);
        let operator = match (bytes.get(at), colon) {
            (Some(b'-'), false) => Operator::Default,
            (Some(b'-'), true) => Operator::DefaultEmpty,
            (Some(b'='), false) => Operator::Assign,
            (Some(b'='), true) => Operator::AssignEmpty,
            (Some(b'+'), false) => Operator::Alternate,
            (Some(b'+'), true) => Operator::AlternateEmpty,
            (Some(b'?'), false) => Operator::Require,
            (Some(b'?'), true) => Operator::RequireEmpty,
            _ => return None,
        };
        Some((operator, at + 1))
    }

    /// Colon variants treat an empty value like an unset one.
    fn empty_is_unset(self) -> bool {
        matches!(
            self,
            Operator::DefaultEmpty
                | Operator::AssignEmpty
                | Operator::AlternateEmpty
                | Operator::RequireEmpty
        )
    }
}

/// A parsed `${...}` reference. The operand is raw, unexpanded text.
#[derive(Debug)]
struct Reference<'t> {
    name: &'t str,
    operator: Option<Operator>,
    operand: &'t str,
}

/// Expands every reference in `template` against `scope`.
///
/// # Errors
///
/// Returns the scope's error type. Engine failures arrive as
/// `ExpansionError` converted through `From`; failures of the scope's own
/// `lookup`/`assign` are returned as they were raised.
pub fn expand<S>(template: &str, scope: &mut S, options: &ExpandOptions) -> Result<String, S::Error>
where
    S: Scope + ?Sized,
{
    debug!(
        "Expanding template of {} bytes (posix: {}, windows: {})",
        template.len(),
        options.posix,
        options.windows
    );
    Expander { scope, options }.run(template, false)
}

/// Expands `template` using a lookup closure and an assign closure.
///
/// The two closures cannot both hold `&mut` to the same table; share it
/// through a `RefCell` or use a [`Scope`] implementation instead.
pub fn expand_with<L, A, E>(
    template: &str,
    lookup: L,
    assign: A,
    options: &ExpandOptions,
) -> Result<String, E>
where
    L: FnMut(&str) -> Result<Option<String>, E>,
    A: FnMut(&str, &str) -> Result<(), E>,
    E: From<ExpansionError>,
{
    let mut scope = FnScope::new(lookup, assign);
    expand(template, &mut scope, options)
}

struct Expander<'a, S: ?Sized> {
    scope: &'a mut S,
    options: &'a ExpandOptions,
}

impl<S: Scope + ?Sized> Expander<'_, S> {
    /// Single pass over `text`. Literal runs are copied as slices between references.
    fn run(&mut self, text: &str, in_operand: bool) -> Result<String, S::Error> {
        let bytes = text.as_bytes();
        let mut out = String::with_capacity(text.len());
        let mut literal_start = 0;
        let mut cursor = 0;

        while cursor < bytes.len() {
            match bytes[cursor] {
                b'$' if self.options.posix => match bytes.get(cursor + 1) {
                    Some(b'{') => {
                        out.push_str(&text[literal_start..cursor]);
                        let (reference, end) = parse_braced(text, cursor)?;
                        let value = self.resolve(reference)?;
                        out.push_str(&value);
                        cursor = end;
                        literal_start = end;
                    }
                    Some(&next) if is_name_byte(next) => {
                        out.push_str(&text[literal_start..cursor]);
                        let end = scan_name(bytes, cursor + 1);
                        let name = &text[cursor + 1..end];
                        let value = self.scope.lookup(name)?;
                        trace!("${} -> {:?}", name, value);
                        out.push_str(value.as_deref().unwrap_or_default());
                        cursor = end;
                        literal_start = end;
                    }
                    _ => cursor += 1,
                },
                b'%' if self.options.windows => {
                    let end = scan_name(bytes, cursor + 1);
                    if end > cursor + 1 && bytes.get(end) == Some(&b'%') {
                        out.push_str(&text[literal_start..cursor]);
                        let name = &text[cursor + 1..end];
                        let value = self.scope.lookup(name)?;
                        trace!("%{}% -> {:?}", name, value);
                        out.push_str(value.as_deref().unwrap_or_default());
                        cursor = end + 1;
                        literal_start = cursor;
                    } else {
                        cursor += 1;
                    }
                }
                b'\\' if in_operand && is_escape(bytes, cursor) => {
                    out.push_str(&text[literal_start..cursor]);
                    literal_start = cursor + 1;
                    cursor += 2;
                }
                _ => cursor += 1,
            }
        }
        out.push_str(&text[literal_start..]);
        Ok(out)
    }

    fn resolve(&mut self, reference: Reference<'_>) -> Result<String, S::Error> {
        let Reference {
            name,
            operator,
            operand,
        } = reference;
        let value = self.scope.lookup(name)?;
        let Some(operator) = operator else {
            trace!("${{{}}} -> {:?}", name, value);
            return Ok(value.unwrap_or_default());
        };

        let missing = match value.as_deref() {
            None => true,
            Some(v) => v.is_empty() && operator.empty_is_unset(),
        };
        trace!(
            "${{{}}} with {:?}: value {:?}, missing: {}",
            name,
            operator,
            value,
            missing
        );

        match operator {
            Operator::Default | Operator::DefaultEmpty if missing => self.run(operand, true),
            Operator::Assign | Operator::AssignEmpty if missing => {
                let expanded = self.run(operand, true)?;
                debug!("Assigning default to '{}'", name);
                self.scope.assign(name, &expanded)?;
                Ok(expanded)
            }
            Operator::Alternate | Operator::AlternateEmpty => {
                if missing {
                    Ok(String::new())
                } else {
                    self.run(operand, true)
                }
            }
            Operator::Require | Operator::RequireEmpty if missing => {
                let message = if operand.is_empty() {
                    if operator.empty_is_unset() {
                        format!("{} is not set or empty", name)
                    } else {
                        format!("{} is not set", name)
                    }
                } else {
                    operand.replace("\\}", "}").replace("\\$", "$")
                };
                Err(ExpansionError::required(name, message).into())
            }
            _ => Ok(value.unwrap_or_default()),
        }
    }
}

fn is_name_byte(byte: u8) -> bool {
    byte == b'_' || byte.is_ascii_alphanumeric()
}

/// Returns the index one past the run of name bytes starting at `from`.
fn scan_name(bytes: &[u8], from: usize) -> usize {
    let mut end = from;
    while end < bytes.len() && is_name_byte(bytes[end]) {
        end += 1;
    }
    end
}

/// Parses the `${...}` starting at `start`, returning the reference and the
/// index just past its closing brace.
fn parse_braced(text: &str, start: usize) -> Result<(Reference<'_>, usize), ExpansionError> {
    let bytes = text.as_bytes();
    let body_start = start + 2;
    let name_end = scan_name(bytes, body_start);
    let name = &text[body_start..name_end];
    let close =
        find_closing_brace(bytes, name_end).ok_or_else(|| ExpansionError::unterminated(name))?;
    let rest = &text[name_end..close];

    if name.is_empty() {
        let token = if rest.is_empty() {
            "}"
        } else {
            leading_chars(rest, 1)
        };
        return Err(ExpansionError::invalid_operator(name, token));
    }
    if rest.is_empty() {
        return Ok((
            Reference {
                name,
                operator: None,
                operand: "",
            },
            close + 1,
        ));
    }

    match Operator::parse(rest) {
        Some((operator, len)) => Ok((
            Reference {
                name,
                operator: Some(operator),
                operand: &rest[len..],
            },
            close + 1,
        )),
        None => {
            let width = if rest.starts_with(':') { 2 } else { 1 };
            Err(ExpansionError::invalid_operator(
                name,
                leading_chars(rest, width),
            ))
        }
    }
}

/// Whether the backslash at `at` escapes the byte after it. Only `\}` and
/// `\$` are escapes; any other backslash is literal text.
fn is_escape(bytes: &[u8], at: usize) -> bool {
    matches!(bytes.get(at + 1), Some(b'}' | b'$'))
}

/// Finds the `}` closing a reference whose body starts at `from`.
/// Nested `${` raise the depth; escaped `}` and `$` are skipped.
fn find_closing_brace(bytes: &[u8], from: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if is_escape(bytes, i) => i += 2,
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                depth += 1;
                i += 2;
            }
            b'}' if depth == 0 => return Some(i),
            b'}' => {
                depth -= 1;
                i += 1;
            }
            _ => i += 1,
        }
    }
    None
}

/// The first `count` characters of `text` (all of it if shorter).
fn leading_chars(text: &str, count: usize) -> &str {
    let end = text
        .char_indices()
        .nth(count)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    &text[..end]
}
