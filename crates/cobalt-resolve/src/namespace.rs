use cobalt_syntax::UsingAlias;

/// Index of a namespace scope in the compilation context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NamespaceId(pub u32);

/// One `namespace` block of one compilation unit, with the `using`
/// directives written inside it. The same namespace declared in two files
/// gets two scopes, since each file has its own directives.
#[derive(Debug, Clone)]
pub struct NamespaceScope {
    /// Fully qualified name; empty for a file's global scope.
    pub name: String,
    pub parent: Option<NamespaceId>,
    /// Imported namespaces, in declaration order.
    pub usings: Vec<String>,
    pub aliases: Vec<UsingAlias>,
}

impl NamespaceScope {
    pub fn qualify(&self, name: &str) -> String {
        qualify(&self.name, name)
    }

    /// Rewrites `name` through a `using` alias, if its first segment is one.
    pub fn expand_alias(&self, name: &str) -> Option<String> {
        let (head, rest) = match name.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (name, None),
        };
        let alias = self.aliases.iter().find(|a| a.alias == head)?;
        Some(match rest {
            Some(rest) => format!("{}.{}", alias.target, rest),
            None => alias.target.clone(),
        })
    }
}

/// Joins a namespace (possibly empty) and a name.
pub fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}.{name}")
    }
}
