//! Fully-qualified function name resolution.
//!
//! An FQFN has the form `namespace#name@appVersion`. Runnables in the
//! default namespace are registered under both their bare name and their
//! namespaced name, so callers may reference them either way; all other
//! runnables resolve only through their namespaced form.

use std::collections::HashMap;

use crate::error::FnNotFound;
use crate::schema::{Directive, NAMESPACE_DEFAULT};

/// Render the FQFN for one function.
pub fn fqfn(namespace: &str, name: &str, version: &str) -> String {
    format!("{namespace}#{name}@{version}")
}

/// Immutable lookup table from function names to FQFNs.
///
/// Built once from a directive — intended after the directive has passed
/// validation — and shared read-only afterwards, so concurrent lookups need
/// no synchronization.
#[derive(Debug, Clone)]
pub struct FqfnResolver {
    entries: HashMap<String, String>,
}

impl FqfnResolver {
    pub fn new(directive: &Directive) -> Self {
        let mut entries = HashMap::new();

        for runnable in &directive.runnables {
            let qualified = fqfn(&runnable.namespace, &runnable.name, &directive.app_version);
            if runnable.namespace == NAMESPACE_DEFAULT {
                entries.insert(runnable.name.clone(), qualified.clone());
            }
            entries.insert(runnable.namespaced(), qualified);
        }

        FqfnResolver { entries }
    }

    /// Look up the FQFN for a bare or namespaced function name.
    pub fn resolve(&self, fn_name: &str) -> Result<&str, FnNotFound> {
        self.entries
            .get(fn_name)
            .map(String::as_str)
            .ok_or_else(|| FnNotFound(fn_name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Runnable;

    fn directive() -> Directive {
        Directive {
            identifier: "com.example.demo".into(),
            app_version: "0.1.0".into(),
            atmo_version: "0.4.0".into(),
            runnables: vec![
                Runnable {
                    name: "fetch".into(),
                    namespace: "default".into(),
                },
                Runnable {
                    name: "hash".into(),
                    namespace: "util".into(),
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn default_namespace_registers_bare_and_namespaced() {
        let resolver = FqfnResolver::new(&directive());
        assert_eq!(resolver.resolve("fetch").unwrap(), "default#fetch@0.1.0");
        assert_eq!(
            resolver.resolve("default#fetch").unwrap(),
            "default#fetch@0.1.0"
        );
    }

    #[test]
    fn other_namespaces_register_namespaced_only() {
        let resolver = FqfnResolver::new(&directive());
        assert_eq!(resolver.resolve("util#hash").unwrap(), "util#hash@0.1.0");
        assert_eq!(resolver.resolve("hash").unwrap_err(), FnNotFound("hash".into()));
    }

    #[test]
    fn unknown_name_reports_not_found() {
        let resolver = FqfnResolver::new(&directive());
        let err = resolver.resolve("missing").unwrap_err();
        assert_eq!(err.to_string(), "fn missing does not exist");
    }
}
