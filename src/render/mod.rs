//! Job compiler: resolves a parsed template against function descriptors
//!
//! Rendering a template against one descriptor is a pure function of
//! (template, descriptor, registry, options). The batch form renders every
//! descriptor in name-sorted order so output is reproducible regardless of
//! input order, and aggregates per-descriptor failures instead of aborting
//! the whole batch.

mod registry;

pub use registry::{CustomResolver, DirectiveRegistry};

use thiserror::Error;

use crate::descriptor::FunctionDescriptor;
use crate::error::Span;
use crate::parser::Template;

/// Delimiter between per-descriptor renderings in batch output
const RENDER_SEPARATOR: &str = "\n\n";

/// Errors resolving a single directive against a descriptor
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("unresolved directive '{{{{{directive}}}}}'")]
    UnresolvedDirective { directive: String, span: Span },

    #[error("index {index} out of range in '{{{{{directive}}}}}': descriptor has {len} {what}(s)")]
    IndexOutOfRange {
        directive: String,
        span: Span,
        index: usize,
        len: usize,
        what: &'static str,
    },

    #[error("custom directive '{{{{{directive}}}}}' failed: {message}")]
    Custom {
        directive: String,
        span: Span,
        message: String,
    },
}

impl RenderError {
    /// Span of the offending placeholder in the template source
    pub fn span(&self) -> Span {
        match self {
            RenderError::UnresolvedDirective { span, .. } => span.clone(),
            RenderError::IndexOutOfRange { span, .. } => span.clone(),
            RenderError::Custom { span, .. } => span.clone(),
        }
    }
}

/// One failed (descriptor, directive) pair in a batch
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{function}: {error}")]
pub struct RenderFailure {
    /// Name of the descriptor whose render failed
    pub function: String,
    pub error: RenderError,
}

/// Aggregated failures from a batch render.
///
/// Carries the partial output (the successful renders, still in sorted
/// order) so callers can decide whether partial output is acceptable; it is
/// never emitted silently.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} of {total} render(s) failed: {}", .failures.len(), format_failures(.failures))]
pub struct BatchError {
    pub failures: Vec<RenderFailure>,
    pub total: usize,
    /// Concatenation of the renders that did succeed
    pub partial: String,
}

fn format_failures(failures: &[RenderFailure]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Rendering knobs that vary by target language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Literal emitted by `args.ident` / `args.name` when the descriptor has
    /// no parameters. Historically `nil`.
    pub empty_args_sentinel: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            empty_args_sentinel: "nil".to_string(),
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_empty_args_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.empty_args_sentinel = sentinel.into();
        self
    }
}

/// Convert a CamelCase name to snake_case: every uppercase letter that is not
/// the first character gets a preceding underscore, then everything is
/// lowercased. `BlockchainInfo` becomes `blockchain_info`.
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            out.push('_');
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// Render one template against one descriptor.
///
/// Walks the segment/directive interleaving in order; the first resolution
/// failure aborts this (template, descriptor) pair.
pub fn render(
    template: &Template,
    descriptor: &FunctionDescriptor,
    registry: &DirectiveRegistry,
    options: &RenderOptions,
) -> Result<String, RenderError> {
    let mut out = String::new();
    for (segment, job) in template.interleaved() {
        out.push_str(segment);
        if let Some(job) = job {
            out.push_str(&registry.resolve(job, descriptor, options)?);
        }
    }
    Ok(out)
}

/// Render one template against every descriptor, in name-sorted order.
///
/// Renderings are joined with two newlines. Failures do not stop the batch:
/// every failing descriptor is reported in the returned `BatchError`
/// alongside the partial output.
pub fn render_all(
    template: &Template,
    descriptors: &[FunctionDescriptor],
    registry: &DirectiveRegistry,
    options: &RenderOptions,
) -> Result<String, BatchError> {
    let mut ordered: Vec<&FunctionDescriptor> = descriptors.iter().collect();
    ordered.sort_by(|a, b| a.name.cmp(&b.name));

    let mut rendered = Vec::new();
    let mut failures = Vec::new();
    for descriptor in ordered {
        match render(template, descriptor, registry, options) {
            Ok(text) => rendered.push(text),
            Err(error) => failures.push(RenderFailure {
                function: descriptor.name.clone(),
                error,
            }),
        }
    }

    let output = rendered.join(RENDER_SEPARATOR);
    if failures.is_empty() {
        Ok(output)
    } else {
        Err(BatchError {
            failures,
            total: descriptors.len(),
            partial: output,
        })
    }
}
