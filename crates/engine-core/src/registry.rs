use crate::{error::RegistryError, migration::Migration};
use std::{collections::HashMap, sync::Arc};

/// Name-keyed store of migrations, built once at startup and passed
/// explicitly through the call chain (no global singleton).
///
/// Lookup by an unknown name yields `None`, a first-class outcome the
/// caller handles, never a default migration.
pub struct Registry {
    order: Vec<String>,
    migrations: HashMap<String, Arc<Migration>>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<Arc<Migration>> {
        self.migrations.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.migrations.contains_key(name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// (name, migration) pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<Migration>)> {
        self.order.iter().map(|name| {
            (
                name.as_str(),
                self.migrations
                    .get(name)
                    .expect("registry order out of sync"),
            )
        })
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[derive(Default)]
pub struct RegistryBuilder {
    order: Vec<String>,
    migrations: HashMap<String, Arc<Migration>>,
}

impl std::fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("order", &self.order)
            .finish()
    }
}

impl RegistryBuilder {
    /// Names are unique; registering a name twice is an error, not a
    /// replacement.
    pub fn register(
        mut self,
        name: &str,
        migration: Migration,
    ) -> Result<Self, RegistryError> {
        if self.migrations.contains_key(name) {
            return Err(RegistryError::DuplicateName {
                name: name.to_string(),
            });
        }
        self.order.push(name.to_string());
        self.migrations.insert(name.to_string(), Arc::new(migration));
        Ok(self)
    }

    pub fn build(self) -> Registry {
        Registry {
            order: self.order,
            migrations: self.migrations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_migration() -> Migration {
        Migration::builder().build()
    }

    #[test]
    fn unknown_name_yields_none() {
        let registry = Registry::builder().build();
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let err = Registry::builder()
            .register("users_sync", empty_migration())
            .expect("first registration")
            .register("users_sync", empty_migration())
            .expect_err("duplicate registration");
        assert!(matches!(err, RegistryError::DuplicateName { name } if name == "users_sync"));
    }

    #[test]
    fn names_keep_registration_order() {
        let registry = Registry::builder()
            .register("b", empty_migration())
            .and_then(|b| b.register("a", empty_migration()))
            .and_then(|b| b.register("m", empty_migration()))
            .expect("register")
            .build();

        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["b", "a", "m"]);
    }
}
