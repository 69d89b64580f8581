//! rpc-stencil - template-driven generation of RPC client method bodies
//!
//! Given a small template containing `{{...}}` placeholder directives and a
//! set of function descriptors (name, parameters, return types), this crate
//! renders the template once per descriptor, substituting directive-specific
//! fragments. One hand-written template per client kind becomes many concrete
//! method bodies.
//!
//! # Example
//!
//! ```rust
//! use rpc_stencil::{generate, FunctionDescriptor};
//!
//! let descriptors = vec![
//!     FunctionDescriptor::new("Status").with_return("*ResultStatus"),
//! ];
//! let out = generate("call({{lowername}}, {{args.ident}})", &descriptors).unwrap();
//! assert_eq!(out, "call(\"status\", nil)");
//! ```

pub mod descriptor;
pub mod error;
pub mod parser;
pub mod render;
pub mod templates;

pub use descriptor::{manifest_from_file, manifest_from_str, FunctionDescriptor, Parameter};
pub use error::{LexError, Location, ParseError, Span};
pub use parser::{parse, Directive, Template};
pub use render::{
    render, render_all, BatchError, DirectiveRegistry, RenderError, RenderFailure, RenderOptions,
};
pub use templates::TemplateSet;

use thiserror::Error;

/// Errors that can occur during a generation run
#[derive(Error, Debug)]
pub enum GenerateError {
    /// No template is registered for the requested client kind
    #[error("no template registered for client kind '{kind}'")]
    UnknownKind { kind: String },

    /// The template failed to lex or parse
    #[error("template error: {0}")]
    Parse(#[from] ParseError),

    /// A single render failed
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// One or more renders in a batch failed
    #[error(transparent)]
    Batch(#[from] BatchError),
}

/// A generation engine owning its template set, directive registry, and
/// render options.
///
/// Replaces the original tool's process-wide mutable registries: an `Engine`
/// is constructed once per run and passed explicitly to render calls, with no
/// ambient global state.
#[derive(Debug, Default)]
pub struct Engine {
    templates: TemplateSet,
    registry: DirectiveRegistry,
    options: RenderOptions,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the template set
    pub fn with_templates(mut self, templates: TemplateSet) -> Self {
        self.templates = templates;
        self
    }

    /// Set the directive registry
    pub fn with_registry(mut self, registry: DirectiveRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Set the render options
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Register a template for a client kind
    pub fn register_template(&mut self, kind: impl Into<String>, source: impl Into<String>) {
        self.templates.insert(kind, source);
    }

    /// Register a custom directive resolver
    pub fn register_directive<F>(&mut self, head: impl Into<String>, resolver: F)
    where
        F: Fn(&FunctionDescriptor, &[String]) -> Result<String, String> + Send + Sync + 'static,
    {
        self.registry.register(head, resolver);
    }

    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    fn parse_kind(&self, kind: &str) -> Result<Template, GenerateError> {
        let source = self
            .templates
            .get(kind)
            .ok_or_else(|| GenerateError::UnknownKind {
                kind: kind.to_string(),
            })?;
        Ok(parse(source)?)
    }

    /// Render the template for `kind` against a single descriptor.
    pub fn render_kind(
        &self,
        kind: &str,
        descriptor: &FunctionDescriptor,
    ) -> Result<String, GenerateError> {
        let template = self.parse_kind(kind)?;
        Ok(render(&template, descriptor, &self.registry, &self.options)?)
    }

    /// Render the template for `kind` against every descriptor, in
    /// name-sorted order, joined by blank lines.
    pub fn generate(
        &self,
        kind: &str,
        descriptors: &[FunctionDescriptor],
    ) -> Result<String, GenerateError> {
        let template = self.parse_kind(kind)?;
        Ok(render_all(
            &template,
            descriptors,
            &self.registry,
            &self.options,
        )?)
    }
}

/// Render a template source against descriptors with default registry and
/// options. This is the main entry point for one-off generation.
pub fn generate(
    template_source: &str,
    descriptors: &[FunctionDescriptor],
) -> Result<String, GenerateError> {
    let template = parse(template_source)?;
    Ok(render_all(
        &template,
        descriptors,
        &DirectiveRegistry::new(),
        &RenderOptions::default(),
    )?)
}
