//! Job definition template rendering
//!
//! Templates are JSON documents with `{{ ... }}` actions. An action is a
//! pipeline of function calls separated by `|`; each later call receives the
//! previous result as its last argument:
//!
//! ```text
//! {{ env "IMAGE_TAG" "latest" }}
//! {{ must_env "EXECUTION_ROLE_ARN" }}
//! {{ env "COMMAND" | json_escape }}
//! {{ tfstate "aws_iam_role.batch.arn" }}
//! {{ tfstatef "aws_subnet.private[%d].id" "1" }}
//! ```
//!
//! `{{-` and `-}}` trim the whitespace before and after the action.

use crate::error::{BatchaError, BatchaResult};
use crate::tfstate::TfState;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""(?:[^"\\]|\\.)*"|`[^`]*`|\||[^\s|"`]+"#).expect("valid template token regex")
});

/// Environment source used by `env` and `must_env`
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Literal(String),
    Ident(String),
    Pipe,
}

/// Renders templates against an environment and optional Terraform states
#[derive(Clone)]
pub struct TemplateRenderer {
    env: EnvLookup,
    tfstates: Vec<TfState>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TemplateRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateRenderer")
            .field("tfstates", &self.tfstates.len())
            .finish()
    }
}

impl TemplateRenderer {
    /// Renderer reading the process environment
    pub fn new() -> Self {
        Self {
            env: Arc::new(|key: &str| std::env::var(key).ok()),
            tfstates: Vec::new(),
        }
    }

    /// Replace the environment source
    pub fn with_env(mut self, env: EnvLookup) -> Self {
        self.env = env;
        self
    }

    /// Make `tfstate` / `tfstatef` resolve against `state`
    pub fn with_tfstate(mut self, state: TfState) -> Self {
        self.tfstates.push(state);
        self
    }

    /// Render a template file and parse the result as a JSON object
    pub fn render_file(&self, path: &Path) -> BatchaResult<Value> {
        let shown = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| {
            BatchaError::template_in(format!("failed to read template: {}", e), &shown)
        })?;

        let rendered = self
            .render_str(&content)
            .map_err(|e| BatchaError::template_in(template_message(e), &shown))?;

        let value: Value = serde_json::from_str(&rendered).map_err(|e| {
            BatchaError::template_in(format!("rendered template is not valid JSON: {}", e), &shown)
        })?;
        if !value.is_object() {
            return Err(BatchaError::template_in(
                "rendered template must be a JSON object",
                &shown,
            ));
        }
        tracing::debug!(path = %shown, "rendered job definition template");
        Ok(value)
    }

    /// Render template text
    pub fn render_str(&self, input: &str) -> BatchaResult<String> {
        let mut output = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(open) = rest.find("{{") {
            let mut text = &rest[..open];
            let after_open = &rest[open + 2..];
            let close = after_open
                .find("}}")
                .ok_or_else(|| BatchaError::template("unterminated action: missing \"}}\""))?;

            let mut body = &after_open[..close];
            let mut remainder = &after_open[close + 2..];

            if let Some(stripped) = body.strip_prefix('-') {
                body = stripped;
                text = text.trim_end();
            }
            if let Some(stripped) = body.strip_suffix('-') {
                body = stripped;
                remainder = remainder.trim_start();
            }

            output.push_str(text);
            output.push_str(&self.eval(body.trim())?);
            rest = remainder;
        }
        output.push_str(rest);
        Ok(output)
    }

    fn eval(&self, action: &str) -> BatchaResult<String> {
        let tokens = tokenize(action)?;
        if tokens.is_empty() {
            return Err(BatchaError::template("empty action"));
        }

        let mut result: Option<String> = None;
        for command in tokens.split(|t| *t == Token::Pipe) {
            let (name, args) = match command.split_first() {
                Some((Token::Ident(name), args)) => (name, args),
                Some((Token::Literal(lit), [])) if result.is_none() => {
                    result = Some(lit.clone());
                    continue;
                }
                _ => {
                    return Err(BatchaError::template(format!(
                        "invalid action {{{{ {} }}}}",
                        action
                    )));
                }
            };

            let mut values = args
                .iter()
                .map(|t| match t {
                    Token::Literal(s) => Ok(s.clone()),
                    _ => Err(BatchaError::template(format!(
                        "function {} only accepts string arguments",
                        name
                    ))),
                })
                .collect::<BatchaResult<Vec<_>>>()?;
            if let Some(previous) = result.take() {
                values.push(previous);
            }
            result = Some(self.call(name, &values)?);
        }

        result.ok_or_else(|| BatchaError::template("empty action"))
    }

    fn call(&self, name: &str, args: &[String]) -> BatchaResult<String> {
        match (name, args) {
            ("env", [key]) => Ok(self.lookup_env(key).unwrap_or_default()),
            ("env", [keys @ .., default]) if !keys.is_empty() => Ok(keys
                .iter()
                .find_map(|k| self.lookup_env(k))
                .unwrap_or_else(|| default.clone())),
            ("must_env", [key]) => (self.env)(key.as_str()).ok_or_else(|| {
                BatchaError::template(format!("environment variable {} is not defined", key))
            }),
            ("json_escape", [value]) => Ok(json_escape(value)),
            ("tfstate", [address]) => self.tfstate_lookup(address),
            ("tfstatef", [format, values @ ..]) => {
                self.tfstate_lookup(&format_address(format, values)?)
            }
            ("env" | "must_env" | "json_escape" | "tfstate" | "tfstatef", _) => Err(
                BatchaError::template(format!("wrong number of arguments for {}", name)),
            ),
            _ => Err(BatchaError::template(format!(
                "function {:?} not defined",
                name
            ))),
        }
    }

    fn lookup_env(&self, key: &str) -> Option<String> {
        (self.env)(key).filter(|v| !v.is_empty())
    }

    fn tfstate_lookup(&self, address: &str) -> BatchaResult<String> {
        if self.tfstates.is_empty() {
            return Err(BatchaError::template(
                "function \"tfstate\" requires a tfstate plugin in config",
            ));
        }
        let mut last_err = None;
        for state in &self.tfstates {
            match state.lookup(address) {
                Ok(value) => return Ok(value),
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| BatchaError::template("tfstate lookup failed")))
    }
}

fn template_message(error: BatchaError) -> String {
    match error {
        BatchaError::Template { message, .. } => message,
        other => other.to_string(),
    }
}

fn tokenize(action: &str) -> BatchaResult<Vec<Token>> {
    TOKEN_RE
        .find_iter(action)
        .map(|m| {
            let raw = m.as_str();
            if raw == "|" {
                Ok(Token::Pipe)
            } else if raw.starts_with('"') {
                serde_json::from_str::<String>(raw)
                    .map(Token::Literal)
                    .map_err(|e| BatchaError::template(format!("invalid string {}: {}", raw, e)))
            } else if let Some(inner) = raw.strip_prefix('`') {
                Ok(Token::Literal(inner.trim_end_matches('`').to_string()))
            } else {
                Ok(Token::Ident(raw.to_string()))
            }
        })
        .collect()
}

/// Escape a string for embedding inside a JSON string literal
fn json_escape(value: &str) -> String {
    let quoted = Value::String(value.to_string()).to_string();
    quoted[1..quoted.len() - 1].to_string()
}

/// Substitute `%s` / `%d` placeholders in order
fn format_address(format: &str, values: &[String]) -> BatchaResult<String> {
    let mut out = String::with_capacity(format.len());
    let mut values = values.iter();
    let mut chars = format.chars();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('%') => out.push('%'),
            Some(verb @ ('s' | 'd')) => {
                let value = values.next().ok_or_else(|| {
                    BatchaError::template(format!("missing argument for %{} in {:?}", verb, format))
                })?;
                if verb == 'd' && value.parse::<i64>().is_err() {
                    return Err(BatchaError::template(format!(
                        "argument {:?} for %d is not an integer",
                        value
                    )));
                }
                out.push_str(value);
            }
            other => {
                return Err(BatchaError::template(format!(
                    "unsupported verb %{} in {:?}",
                    other.map(String::from).unwrap_or_default(),
                    format
                )));
            }
        }
    }
    Ok(out)
}
