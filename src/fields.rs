//! Fields a filter can be built on, and where their selectable values come from.
//!
//! A field may name a loader. Loaders are looked up by name in a [LoaderRegistry] that the
//! caller builds and owns:
//! ```
//! # use vysta_bql::fields::{FieldDefinition, LoaderRegistry, StaticOptions};
//! # use vysta_bql::condition::DataType;
//! let mut registry = LoaderRegistry::default();
//! registry.register("countries", StaticOptions::new(["NL", "BE", "DE"]));
//!
//! let field = FieldDefinition::new("country", DataType::VarChar).with_loader("countries");
//! let options = registry.load_options(&field, "b").unwrap();
//!
//! assert_eq!("BE", options[0].value);
//! ```
use crate::condition::{comparison_operators_by_data_type, ComparisonOperator, DataType};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FieldError {
    #[error("loader is not defined: `{0}`")]
    LoaderNotDefined(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub property_name: String,
    #[serde(default)]
    pub label: String,
    pub data_type: DataType,
    /// Name of the registered loader providing the field's values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loader: Option<String>,
}

/// One selectable value of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

/// Provides the values a user can pick for a field, narrowed down by `search`.
pub trait OptionLoader: Send + Sync {
    fn load(&self, field: &FieldDefinition, search: &str)
        -> Result<Vec<FieldOption>, crate::Error>;
}

#[derive(Default)]
pub struct LoaderRegistry {
    loaders: HashMap<String, Box<dyn OptionLoader>>,
}

/// A fixed list of options, searched by case-insensitive substring.
#[derive(Debug, Clone, Default)]
pub struct StaticOptions {
    options: Vec<FieldOption>,
}

impl FieldDefinition {
    pub fn new<T: Into<String>>(property_name: T, data_type: DataType) -> Self {
        let property_name = property_name.into();

        FieldDefinition {
            label: property_name.clone(),
            property_name,
            data_type,
            loader: None,
        }
    }

    pub fn with_loader<T: Into<String>>(self, loader: T) -> Self {
        FieldDefinition {
            loader: Some(loader.into()),
            ..self
        }
    }

    /// Operators a condition on this field may use.
    pub fn operators(&self) -> &'static [ComparisonOperator] {
        comparison_operators_by_data_type(self.data_type)
    }
}

impl FieldOption {
    pub fn new<T: Into<String>>(value: T) -> Self {
        let value = value.into();

        FieldOption {
            label: value.clone(),
            value,
        }
    }
}

impl LoaderRegistry {
    /// Registers `loader` under `name`, replacing any loader registered with that name before.
    pub fn register<T>(&mut self, name: &str, loader: T)
    where
        T: OptionLoader + 'static,
    {
        debug!("Registering option loader {name}");

        self.loaders.insert(name.to_owned(), Box::new(loader));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.loaders.contains_key(name)
    }

    /// The loader for `field`. Fields without a loader resolve to `None`.
    pub fn resolve(
        &self,
        field: &FieldDefinition,
    ) -> Result<Option<&dyn OptionLoader>, FieldError> {
        let Some(name) = field.loader.as_deref() else {
            return Ok(None);
        };

        match self.loaders.get(name) {
            Some(loader) => Ok(Some(loader.as_ref())),
            None => Err(FieldError::LoaderNotDefined(name.to_owned())),
        }
    }

    /// Loads the options for `field`. Fields without a loader have none.
    pub fn load_options(
        &self,
        field: &FieldDefinition,
        search: &str,
    ) -> Result<Vec<FieldOption>, crate::Error> {
        match self.resolve(field)? {
            Some(loader) => loader.load(field, search),
            None => Ok(vec![]),
        }
    }
}

impl StaticOptions {
    pub fn new<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        StaticOptions {
            options: values.into_iter().map(FieldOption::new).collect(),
        }
    }

    pub fn with_options(options: Vec<FieldOption>) -> Self {
        StaticOptions { options }
    }
}

impl OptionLoader for StaticOptions {
    fn load(
        &self,
        _field: &FieldDefinition,
        search: &str,
    ) -> Result<Vec<FieldOption>, crate::Error> {
        let search = search.to_lowercase();

        Ok(self
            .options
            .iter()
            .filter(|option| {
                option.label.to_lowercase().contains(&search)
                    || option.value.to_lowercase().contains(&search)
            })
            .cloned()
            .collect())
    }
}
