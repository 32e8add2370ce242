//! Forms with repeatable nested sub-forms.
//!
//! A [`TreeForm`] owns, for every registered sub-form type, a map from
//! instance index to sub-form. Index 0 always holds the template registered
//! with [`add_sub_form`](TreeForm::add_sub_form); other indices are
//! materialized on demand from the template's definitions (never copied
//! from its live state) and dropped again by [`reset`](Form::reset).
//!
//! Each node records its lineage, the path of `{name, index}` locations
//! from the root down to itself. Field identifiers encode that lineage (see
//! [`identifier`](crate::identifier)), so one flat submission can address
//! any field of any instance at any depth:
//!
//! ```
//! use formskit_forms::prelude::*;
//!
//! let mut tree = TreeForm::new("MainForm")
//!     .field(FieldDef::new("something"))
//!     .sub_form(TreeForm::new("PeopleForm").field(FieldDef::new("name")));
//!
//! let mut raw = RawData::new();
//! raw.append("form_name", "MainForm");
//! raw.append(tree.identifier("something").unwrap(), "value");
//! let token = tree
//!     .get_or_create_sub_form("PeopleForm", 4)
//!     .unwrap()
//!     .identifier("name")
//!     .unwrap();
//! raw.append(token, "Ann");
//!
//! assert_eq!(tree.validate(&raw).unwrap(), Some(true));
//! let row = tree.get_sub_form("PeopleForm", 4).unwrap();
//! assert_eq!(row.get_value("name").unwrap(), Value::from("Ann"));
//! ```

use std::collections::BTreeMap;

use indexmap::IndexMap;

use formskit_core::{FormskitError, FormskitResult};

use crate::data::{DataDict, DataEntry};
use crate::field::{Field, FieldDef};
use crate::form::{json_object, BaseForm, Form};
use crate::form_validators::FormValidator;
use crate::identifier::{FieldIdentifier, FormLocation};
use crate::report::FormReport;

/// A form with repeatable nested sub-forms.
#[derive(Debug, Clone)]
pub struct TreeForm {
    base: BaseForm,
    index: Option<usize>,
    lineage: Vec<FormLocation>,
    childs: IndexMap<String, BTreeMap<usize, TreeForm>>,
}

impl TreeForm {
    /// Creates a root tree form with no fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_base(BaseForm::new(name))
    }

    /// Wraps a flat form as the root of a tree.
    pub fn from_base(base: BaseForm) -> Self {
        let lineage = vec![FormLocation::new(base.name(), None)];
        Self {
            base,
            index: None,
            lineage,
            childs: IndexMap::new(),
        }
    }

    /// Adds a field (builder style).
    #[must_use]
    pub fn field(mut self, def: impl Into<std::sync::Arc<FieldDef>>) -> Self {
        self.base.add_field(def);
        self
    }

    /// Adds a form validator (builder style).
    #[must_use]
    pub fn form_validator(mut self, validator: impl FormValidator + 'static) -> Self {
        self.base.add_form_validator(validator);
        self
    }

    /// Registers a sub-form type (builder style).
    #[must_use]
    pub fn sub_form(mut self, child: Self) -> Self {
        self.add_sub_form(child);
        self
    }

    /// Adds a fresh field instance of `def`.
    pub fn add_field(&mut self, def: impl Into<std::sync::Arc<FieldDef>>) -> &mut Field {
        self.base.add_field(def)
    }

    /// Adds an existing field instance.
    pub fn add_field_object(&mut self, field: Field) -> &mut Field {
        self.base.add_field_object(field)
    }

    /// Adds a form validator.
    pub fn add_form_validator(&mut self, validator: impl FormValidator + 'static) {
        self.base.add_form_validator(validator);
    }

    /// Registers `child` as the template of a sub-form type, at index 0.
    ///
    /// The type is keyed by the child's name; registering a second child
    /// with the same name replaces the first along with its instances.
    pub fn add_sub_form(&mut self, mut child: Self) {
        child.relocate(&self.lineage, 0);
        let name = child.base.name().to_string();
        self.childs.insert(name, BTreeMap::from([(0, child)]));
    }

    /// Returns an existing sub-form instance.
    pub fn get_sub_form(&self, name: &str, index: usize) -> Option<&Self> {
        self.childs.get(name)?.get(&index)
    }

    /// Returns an existing sub-form instance mutably.
    pub fn get_sub_form_mut(&mut self, name: &str, index: usize) -> Option<&mut Self> {
        self.childs.get_mut(name)?.get_mut(&index)
    }

    /// Returns the sub-form instance at `index`, creating it from the
    /// template if it does not exist yet.
    ///
    /// Fails with [`FormskitError::SubFormNotFound`] if no sub-form type
    /// called `name` was registered.
    pub fn get_or_create_sub_form(&mut self, name: &str, index: usize) -> FormskitResult<&mut Self> {
        let not_found = |form: &str| FormskitError::SubFormNotFound {
            form: form.to_string(),
            name: name.to_string(),
        };
        if !self.childs.contains_key(name) {
            return Err(not_found(self.base.name()));
        }

        let lineage = self.lineage.clone();
        let form_name = self.base.name().to_string();
        let instances = self
            .childs
            .get_mut(name)
            .ok_or_else(|| not_found(&form_name))?;

        if !instances.contains_key(&index) {
            let template = instances.get(&0).ok_or_else(|| not_found(&form_name))?;
            let mut fresh = template.instantiate();
            fresh.relocate(&lineage, index);
            tracing::debug!(parent = %form_name, sub_form = name, index, "created sub-form instance");
            instances.insert(index, fresh);
        }

        instances.get_mut(&index).ok_or_else(|| not_found(&form_name))
    }

    /// Returns every instance of a sub-form type, by index.
    pub fn sub_forms(&self, name: &str) -> Option<&BTreeMap<usize, Self>> {
        self.childs.get(name)
    }

    /// Returns every sub-form type and its instances.
    pub const fn childs(&self) -> &IndexMap<String, BTreeMap<usize, Self>> {
        &self.childs
    }

    /// Builds a fresh tree with the same structure and no submitted state:
    /// fields are rebuilt from their definitions and each sub-form type
    /// holds only a fresh template.
    #[must_use]
    pub fn instantiate(&self) -> Self {
        let childs = self
            .childs
            .iter()
            .filter_map(|(name, instances)| {
                let template = instances.get(&0)?;
                Some((name.clone(), BTreeMap::from([(0, template.instantiate())])))
            })
            .collect();
        Self {
            base: self.base.instantiate(),
            index: self.index,
            lineage: self.lineage.clone(),
            childs,
        }
    }

    /// Returns this form's index among its siblings; `None` for the root.
    pub const fn index(&self) -> Option<usize> {
        self.index
    }

    /// Returns the path from the root down to this form.
    pub fn parents(&self) -> &[FormLocation] {
        &self.lineage
    }

    /// Returns the wire identifier of one of this form's fields.
    pub fn identifier(&self, field_name: &str) -> FormskitResult<String> {
        self.base.require_field(field_name)?;
        FieldIdentifier::new(field_name, self.lineage.clone()).encode()
    }

    /// Returns a field by name.
    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.base.get_field(name)
    }

    /// Returns a field by name, mutably.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.base.field_mut(name)
    }

    /// Places this form at `index` under `parent`, updating the lineage of
    /// every descendant.
    fn relocate(&mut self, parent: &[FormLocation], index: usize) {
        self.index = Some(index);
        self.lineage = parent.to_vec();
        self.lineage
            .push(FormLocation::new(self.base.name(), Some(index)));

        let lineage = self.lineage.clone();
        for instances in self.childs.values_mut() {
            for (child_index, child) in instances.iter_mut() {
                child.relocate(&lineage, *child_index);
            }
        }
    }

    /// Walks `path` down from this form, creating instances as needed.
    fn descend(&mut self, token: &str, path: &[FormLocation]) -> FormskitResult<&mut Self> {
        let Some((step, rest)) = path.split_first() else {
            return Ok(self);
        };
        let index = step
            .index
            .ok_or_else(|| FormskitError::BadFieldReference(token.to_string()))?;
        self.get_or_create_sub_form(&step.name, index)?
            .descend(token, rest)
    }
}

impl Form for TreeForm {
    fn base(&self) -> &BaseForm {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseForm {
        &mut self.base
    }

    /// Decodes `key` as a field identifier and returns the field it names,
    /// materializing any sub-form instance on the way.
    fn resolve_field(&mut self, key: &str) -> FormskitResult<&mut Field> {
        let identifier = FieldIdentifier::decode(key)?;
        let Some((root, path)) = identifier.parents.split_first() else {
            return Err(FormskitError::BadFieldReference(key.to_string()));
        };
        if root.name != self.base.name() {
            tracing::warn!(expected = %self.base.name(), got = %root.name, "identifier names another form");
            return Err(FormskitError::BadFieldReference(key.to_string()));
        }

        let form = self.descend(key, path)?;
        let form_name = form.base.name().to_string();
        form.base
            .field_mut(&identifier.name)
            .ok_or_else(|| FormskitError::FieldNotFound {
                form: form_name,
                field: identifier.name,
            })
    }

    /// Validates this form, then every sub-form instance regardless of the
    /// outcome; the tree passes only if every node passed.
    fn run_validation(&mut self) -> bool {
        let mut success = self.base.validate_fields();
        for instances in self.childs.values_mut() {
            for child in instances.values_mut() {
                success &= child.run_validation();
            }
        }
        self.base.set_success(Some(success));
        success
    }

    fn reset(&mut self) {
        self.base.reset_fields();
        for instances in self.childs.values_mut() {
            instances.retain(|index, _| *index == 0);
            if let Some(template) = instances.get_mut(&0) {
                template.reset();
            }
        }
    }

    fn get_report(&self) -> FormReport {
        let mut report = self.base.fields_report();
        report.childs = Some(
            self.childs
                .iter()
                .map(|(name, instances)| {
                    let reports = instances
                        .iter()
                        .map(|(index, child)| (*index, child.get_report()))
                        .collect();
                    (name.clone(), reports)
                })
                .collect(),
        );
        report
    }

    fn get_data_dict(&self, minified: bool) -> DataDict {
        let mut data = self.base.fields_data(minified);
        for (name, instances) in &self.childs {
            let rows = instances
                .iter()
                .map(|(index, child)| (*index, child.get_data_dict(minified)))
                .collect();
            data.insert(name.clone(), DataEntry::SubForms(rows));
        }
        data
    }

    /// Writes values from `{field: values, SubForm: [{row0}, {row1}]}`.
    /// Rows map to instance indices by position.
    fn parse_dict(&mut self, data: &serde_json::Value) -> FormskitResult<()> {
        for (key, value) in json_object(data)? {
            if !self.childs.contains_key(key) {
                self.base.parse_field_json(key, value)?;
                continue;
            }
            let rows = value.as_array().ok_or_else(|| {
                FormskitError::SerializationError(format!(
                    "sub-form '{key}' expects an array of objects"
                ))
            })?;
            for (index, row) in rows.iter().enumerate() {
                self.get_or_create_sub_form(key, index)?.parse_dict(row)?;
            }
        }
        Ok(())
    }
}
