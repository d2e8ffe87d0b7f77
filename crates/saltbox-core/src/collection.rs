/// Where the project's own states land below the file root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionName {
    /// `collection_name` was set explicitly.
    Explicit(String),
    /// Inferred from `formula`.
    Formula(String),
    /// Neither was set: the project tree is the file root.
    FileRoot,
}

impl CollectionName {
    /// Subpath below the file root; empty for [`CollectionName::FileRoot`].
    pub fn subpath(&self) -> &str {
        match self {
            Self::Explicit(name) | Self::Formula(name) => name,
            Self::FileRoot => "",
        }
    }
}

pub fn resolve_collection_name(
    collection_name: Option<&str>,
    formula: Option<&str>,
) -> CollectionName {
    match (collection_name, formula) {
        (Some(name), _) => CollectionName::Explicit(name.to_owned()),
        (None, Some(formula)) => CollectionName::Formula(formula.to_owned()),
        (None, None) => CollectionName::FileRoot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_name_wins_over_formula() {
        let resolved = resolve_collection_name(Some("states"), Some("apache"));
        assert_eq!(resolved, CollectionName::Explicit("states".to_owned()));
        assert_eq!(resolved.subpath(), "states");
    }

    #[test]
    fn formula_is_the_fallback() {
        let resolved = resolve_collection_name(None, Some("apache"));
        assert_eq!(resolved, CollectionName::Formula("apache".to_owned()));
        assert_eq!(resolved.subpath(), "apache");
    }

    #[test]
    fn neither_set_means_file_root() {
        let resolved = resolve_collection_name(None, None);
        assert_eq!(resolved, CollectionName::FileRoot);
        assert_eq!(resolved.subpath(), "");
    }
}
