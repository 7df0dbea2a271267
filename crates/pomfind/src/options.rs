//! Which sub-dependencies the resolver follows.

use pomfind_maven::Dependency;

/// Scope marking dependency management entries that carry no real edge.
const NONE_SCOPE: &str = "none";

/// Scopes skipped unless configured otherwise.
pub const DEFAULT_IGNORED_SCOPES: &[&str] = &["provided", "system", "test"];

/// Traversal options.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Children whose scope equals one of these are not followed.
    pub ignore_scopes: Vec<String>,
    /// Skip `<optional>true</optional>` children.
    pub ignore_optional: bool,
    /// Skip children from `<dependencyManagement>`.
    pub ignore_transitive: bool,
    /// Follow children at all; when off only the roots are resolved.
    pub recursive: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            ignore_scopes: DEFAULT_IGNORED_SCOPES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            ignore_optional: true,
            ignore_transitive: true,
            recursive: true,
        }
    }
}

impl ResolveOptions {
    /// Returns true if `dep` must not be resolved as a child.
    pub fn excludes(&self, dep: &Dependency) -> bool {
        if dep.transitive {
            if self.ignore_transitive {
                return true;
            }
            // Unscoped managed entries only pin versions.
            if dep.scope.is_empty() || dep.scope == NONE_SCOPE {
                return true;
            }
        }
        if self.ignore_scopes.iter().any(|s| *s == dep.scope) {
            return true;
        }
        self.ignore_optional && dep.optional
    }
}

/// Splits a comma separated scope list, dropping blank entries.
pub fn parse_scope_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
