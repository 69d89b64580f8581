//! Directive registry: the fixed built-in table plus caller-registered
//! custom resolvers

use std::collections::HashMap;

use crate::descriptor::FunctionDescriptor;
use crate::parser::Directive;
use crate::render::{snake_case, RenderError, RenderOptions};

/// A caller-supplied resolver for a custom directive head.
///
/// Receives the descriptor being rendered and the path components after the
/// registered head; an `Err` message aborts the render of that one
/// (template, descriptor) pair.
pub type CustomResolver =
    Box<dyn Fn(&FunctionDescriptor, &[String]) -> Result<String, String> + Send + Sync>;

/// Maps directive identifiers to resolution logic.
///
/// The built-in table (`name`, `lowername`, `args.*`, `response.*`) is fixed;
/// custom entries are consulted for any other head component. Constructed
/// once per generation run and read-only during rendering.
#[derive(Default)]
pub struct DirectiveRegistry {
    custom: HashMap<String, CustomResolver>,
}

impl std::fmt::Debug for DirectiveRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectiveRegistry")
            .field("custom", &self.custom.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl DirectiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom resolver. Built-in names cannot be shadowed; the
    /// built-in table is always consulted first.
    pub fn register<F>(&mut self, head: impl Into<String>, resolver: F)
    where
        F: Fn(&FunctionDescriptor, &[String]) -> Result<String, String> + Send + Sync + 'static,
    {
        self.custom.insert(head.into(), Box::new(resolver));
    }

    pub fn contains(&self, head: &str) -> bool {
        self.custom.contains_key(head)
    }

    /// Resolve one directive against a descriptor.
    pub fn resolve(
        &self,
        directive: &Directive,
        f: &FunctionDescriptor,
        options: &RenderOptions,
    ) -> Result<String, RenderError> {
        match directive.head() {
            "name" if directive.tail().is_empty() => Ok(f.name.clone()),
            "lowername" if directive.tail().is_empty() => {
                Ok(format!("\"{}\"", snake_case(&f.name)))
            }
            "args" => resolve_args(directive, f, options),
            "response" => resolve_response(directive, f),
            head => match self.custom.get(head) {
                Some(resolver) => {
                    resolver(f, directive.tail()).map_err(|message| RenderError::Custom {
                        directive: directive.dotted(),
                        span: directive.span.clone(),
                        message,
                    })
                }
                None => Err(unresolved(directive)),
            },
        }
    }
}

/// Which projection of a parameter list a directive asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArgSelector {
    /// `name type` pairs
    Def,
    /// bare names
    Ident,
    /// a quoted string-list literal of names
    Name,
}

impl ArgSelector {
    fn from_component(c: &str) -> Option<Self> {
        match c {
            "def" => Some(ArgSelector::Def),
            "ident" => Some(ArgSelector::Ident),
            "name" => Some(ArgSelector::Name),
            _ => None,
        }
    }
}

/// `args.def` / `args.ident` / `args.name`, optionally restricted to a single
/// zero-based index: `args.N`, `args.N.ident`, ...
fn resolve_args(
    directive: &Directive,
    f: &FunctionDescriptor,
    options: &RenderOptions,
) -> Result<String, RenderError> {
    let tail = directive.tail();
    let (params, selector_component) = match tail.first() {
        None => return Err(unresolved(directive)),
        Some(first) => match first.parse::<usize>() {
            Ok(index) => {
                let param = f.params.get(index).ok_or_else(|| RenderError::IndexOutOfRange {
                    directive: directive.dotted(),
                    span: directive.span.clone(),
                    index,
                    len: f.params.len(),
                    what: "parameter",
                })?;
                (std::slice::from_ref(param), tail.get(1))
            }
            Err(_) => (f.params.as_slice(), Some(first)),
        },
    };

    // A bare index renders like `def`
    let selector = match selector_component {
        None => ArgSelector::Def,
        Some(c) => ArgSelector::from_component(c).ok_or_else(|| unresolved(directive))?,
    };

    let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
    Ok(match selector {
        ArgSelector::Def => params
            .iter()
            .map(|p| format!("{} {}", p.name, p.ty))
            .collect::<Vec<_>>()
            .join(", "),
        ArgSelector::Ident => {
            if names.is_empty() {
                options.empty_args_sentinel.clone()
            } else {
                names.join(", ")
            }
        }
        ArgSelector::Name => {
            if names.is_empty() {
                options.empty_args_sentinel.clone()
            } else {
                format!("[]string{{\"{}\"}}", names.join("\", \""))
            }
        }
    })
}

/// `response` (all return types) or `response.N` (a single one)
fn resolve_response(directive: &Directive, f: &FunctionDescriptor) -> Result<String, RenderError> {
    match directive.tail() {
        [] => Ok(f.returns.join(", ")),
        [index_component] => {
            let index: usize = index_component
                .parse()
                .map_err(|_| unresolved(directive))?;
            f.returns
                .get(index)
                .cloned()
                .ok_or_else(|| RenderError::IndexOutOfRange {
                    directive: directive.dotted(),
                    span: directive.span.clone(),
                    index,
                    len: f.returns.len(),
                    what: "return",
                })
        }
        _ => Err(unresolved(directive)),
    }
}

fn unresolved(directive: &Directive) -> RenderError {
    RenderError::UnresolvedDirective {
        directive: directive.dotted(),
        span: directive.span.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FunctionDescriptor;

    fn directive(path: &str) -> Directive {
        Directive::new(path.split('.').map(str::to_string).collect(), 0..path.len() + 4)
    }

    fn two_arg_func() -> FunctionDescriptor {
        FunctionDescriptor::new("BlockchainInfo")
            .with_param("minHeight", "int")
            .with_param("maxHeight", "int")
            .with_return("*ResultBlockchainInfo")
            .with_return("error")
    }

    fn resolve(path: &str, f: &FunctionDescriptor) -> Result<String, RenderError> {
        DirectiveRegistry::new().resolve(&directive(path), f, &RenderOptions::default())
    }

    #[test]
    fn test_name() {
        assert_eq!(resolve("name", &two_arg_func()).unwrap(), "BlockchainInfo");
    }

    #[test]
    fn test_lowername_is_quoted_snake_case() {
        assert_eq!(
            resolve("lowername", &two_arg_func()).unwrap(),
            "\"blockchain_info\""
        );
    }

    #[test]
    fn test_args_def() {
        assert_eq!(
            resolve("args.def", &two_arg_func()).unwrap(),
            "minHeight int, maxHeight int"
        );
    }

    #[test]
    fn test_args_ident() {
        assert_eq!(
            resolve("args.ident", &two_arg_func()).unwrap(),
            "minHeight, maxHeight"
        );
    }

    #[test]
    fn test_args_ident_empty_uses_sentinel() {
        let f = FunctionDescriptor::new("Status");
        assert_eq!(resolve("args.ident", &f).unwrap(), "nil");
    }

    #[test]
    fn test_args_name_quoted_list() {
        assert_eq!(
            resolve("args.name", &two_arg_func()).unwrap(),
            "[]string{\"minHeight\", \"maxHeight\"}"
        );
    }

    #[test]
    fn test_args_name_empty_uses_sentinel() {
        let f = FunctionDescriptor::new("Status");
        assert_eq!(resolve("args.name", &f).unwrap(), "nil");
    }

    #[test]
    fn test_args_indexed_defaults_to_def() {
        assert_eq!(resolve("args.1", &two_arg_func()).unwrap(), "maxHeight int");
    }

    #[test]
    fn test_args_indexed_with_selector() {
        assert_eq!(resolve("args.0.ident", &two_arg_func()).unwrap(), "minHeight");
        assert_eq!(
            resolve("args.0.name", &two_arg_func()).unwrap(),
            "[]string{\"minHeight\"}"
        );
    }

    #[test]
    fn test_args_index_out_of_range() {
        let err = resolve("args.5", &two_arg_func()).unwrap_err();
        match err {
            RenderError::IndexOutOfRange { index, len, .. } => {
                assert_eq!(index, 5);
                assert_eq!(len, 2);
            }
            other => panic!("expected IndexOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn test_args_without_selector_is_unresolved() {
        assert!(matches!(
            resolve("args", &two_arg_func()),
            Err(RenderError::UnresolvedDirective { .. })
        ));
    }

    #[test]
    fn test_response_joins_all_returns() {
        assert_eq!(
            resolve("response", &two_arg_func()).unwrap(),
            "*ResultBlockchainInfo, error"
        );
    }

    #[test]
    fn test_response_indexed() {
        assert_eq!(resolve("response.1", &two_arg_func()).unwrap(), "error");
    }

    #[test]
    fn test_response_index_out_of_range() {
        assert!(matches!(
            resolve("response.7", &two_arg_func()),
            Err(RenderError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_unknown_directive_is_unresolved() {
        assert!(matches!(
            resolve("bogus", &two_arg_func()),
            Err(RenderError::UnresolvedDirective { .. })
        ));
    }

    #[test]
    fn test_custom_resolver() {
        let mut registry = DirectiveRegistry::new();
        registry.register("serialize", |f, tail| {
            Ok(format!("serialize_{}({})", tail.join("_"), f.name))
        });
        let out = registry
            .resolve(
                &directive("serialize.json"),
                &two_arg_func(),
                &RenderOptions::default(),
            )
            .unwrap();
        assert_eq!(out, "serialize_json(BlockchainInfo)");
    }

    #[test]
    fn test_custom_resolver_failure_surfaces() {
        let mut registry = DirectiveRegistry::new();
        registry.register("nope", |_, _| Err("unsupported type".to_string()));
        let err = registry
            .resolve(&directive("nope"), &two_arg_func(), &RenderOptions::default())
            .unwrap_err();
        assert!(matches!(err, RenderError::Custom { .. }));
        assert!(err.to_string().contains("unsupported type"));
    }

    #[test]
    fn test_builtin_names_not_shadowed_by_custom() {
        let mut registry = DirectiveRegistry::new();
        registry.register("name", |_, _| Ok("shadowed".to_string()));
        let out = registry
            .resolve(&directive("name"), &two_arg_func(), &RenderOptions::default())
            .unwrap();
        assert_eq!(out, "BlockchainInfo");
    }
}
