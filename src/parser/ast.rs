//! Parsed template representation

use crate::error::Span;

/// A single placeholder occurrence: a dotted identifier path to be resolved
/// against a function descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Path components, split on `.`; always at least one
    pub path: Vec<String>,
    /// Span of the whole `{{...}}` placeholder, for error reporting
    pub span: Span,
}

impl Directive {
    pub fn new(path: Vec<String>, span: Span) -> Self {
        debug_assert!(!path.is_empty());
        Directive { path, span }
    }

    /// The first path component, which selects the resolver
    pub fn head(&self) -> &str {
        &self.path[0]
    }

    /// Path components after the head
    pub fn tail(&self) -> &[String] {
        &self.path[1..]
    }

    /// The dotted path as written in the template
    pub fn dotted(&self) -> String {
        self.path.join(".")
    }
}

impl std::fmt::Display for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{{{}}}}}", self.dotted())
    }
}

/// A parsed template: literal segments interleaved with directives.
///
/// The render contract is `S0 ++ D0 ++ S1 ++ D1 ++ ... ++ Sn`, so
/// `segments.len() == jobs.len() + 1` always holds; empty leading and
/// trailing segments are represented explicitly. The parser guarantees this
/// by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<String>,
    jobs: Vec<Directive>,
}

impl Template {
    pub(crate) fn from_parts(segments: Vec<String>, jobs: Vec<Directive>) -> Self {
        debug_assert_eq!(segments.len(), jobs.len() + 1);
        Template { segments, jobs }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn jobs(&self) -> &[Directive] {
        &self.jobs
    }

    /// Iterate segments and directives in render order: every directive is
    /// preceded by one segment, and one trailing segment follows the last.
    pub fn interleaved(&self) -> impl Iterator<Item = (&str, Option<&Directive>)> {
        self.segments
            .iter()
            .enumerate()
            .map(move |(i, seg)| (seg.as_str(), self.jobs.get(i)))
    }
}
