//! Per-type field registration and the resulting ordered schema
//!
//! Copyright (c) 2025 Modelmap Team
//! Licensed under the Apache-2.0 license

use super::descriptor::{FieldDescriptor, NestedType, TypeTag};
use super::slot::{
    CustomSlot, InheritedSlot, NestedListSlot, NestedSlot, OptionalNestedSlot, Slot, ValueSlot,
};
use super::value::FieldValue;
use crate::model::{short_type_name, Model};
use std::collections::HashSet;
use std::sync::Arc;

/// One registered field: its metadata and its accessor
pub(crate) struct FieldEntry<M> {
    pub(crate) descriptor: FieldDescriptor,
    pub(crate) slot: Arc<dyn Slot<M>>,
}

/// The ordered fields of a model type
///
/// Fields inherited from base models come first, deepest base first; each
/// level keeps its registration order. A field registered by a derived model
/// shadows a base field of the same name.
pub struct Schema<M> {
    entries: Vec<FieldEntry<M>>,
}

impl<M: Model> Schema<M> {
    /// Run the model's registration
    pub fn build() -> Self {
        let mut builder = SchemaBuilder::new();
        M::describe(&mut builder);
        builder.finish()
    }
}

impl<M> Schema<M> {
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.entries.iter().map(|entry| &entry.descriptor)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields().find(|descriptor| descriptor.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields().map(|descriptor| descriptor.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entries(&self) -> &[FieldEntry<M>] {
        &self.entries
    }
}

/// Builder handed to [`Model::describe`]
pub struct SchemaBuilder<M> {
    entries: Vec<FieldEntry<M>>,
}

impl<M: 'static> SchemaBuilder<M> {
    fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Register a primitive, `Option`, `Required`, date or primitive-list field
    ///
    /// Only `Required<T>` is reported missing when its key is absent. A plain
    /// `T` (`id: i64`, `tags: Vec<String>`) always holds a value, so an absent
    /// key silently leaves its current value, usually the default.
    pub fn field<T: FieldValue>(
        &mut self,
        name: impl Into<String>,
        get: fn(&M) -> &T,
        get_mut: fn(&mut M) -> &mut T,
    ) -> &mut Self {
        let descriptor = FieldDescriptor::new(name, T::type_tag(), T::is_optional());
        self.push(descriptor, Arc::new(ValueSlot { get, get_mut }))
    }

    /// Register a nested model held by value
    pub fn nested<N: Model + Clone>(
        &mut self,
        name: impl Into<String>,
        get: fn(&M) -> &N,
        get_mut: fn(&mut M) -> &mut N,
    ) -> &mut Self {
        let descriptor = FieldDescriptor::new(name, TypeTag::Model(short_type_name::<N>()), false)
            .with_nested(NestedType::of::<N>());
        self.push(descriptor, Arc::new(NestedSlot { get, get_mut }))
    }

    /// Register a nested model that may be absent or null
    pub fn optional_nested<N: Model + Clone>(
        &mut self,
        name: impl Into<String>,
        get: fn(&M) -> &Option<N>,
        get_mut: fn(&mut M) -> &mut Option<N>,
    ) -> &mut Self {
        let descriptor = FieldDescriptor::new(name, TypeTag::Model(short_type_name::<N>()), true)
            .with_nested(NestedType::of::<N>());
        self.push(descriptor, Arc::new(OptionalNestedSlot { get, get_mut }))
    }

    /// Register a sequence of nested models
    ///
    /// Like a plain `Vec<T>`, the list always holds a value: an absent key
    /// leaves it as it is and an empty list is a valid fill.
    pub fn nested_list<N: Model + Clone>(
        &mut self,
        name: impl Into<String>,
        get: fn(&M) -> &Vec<N>,
        get_mut: fn(&mut M) -> &mut Vec<N>,
    ) -> &mut Self {
        let descriptor =
            FieldDescriptor::new(name, TypeTag::ModelList(short_type_name::<N>()), false)
                .with_nested(NestedType::of::<N>());
        self.push(descriptor, Arc::new(NestedListSlot { get, get_mut }))
    }

    /// Register an author-defined field; it maps only through a converter
    pub fn custom<T: Clone + 'static>(
        &mut self,
        name: impl Into<String>,
        get: fn(&M) -> &T,
        get_mut: fn(&mut M) -> &mut T,
    ) -> &mut Self {
        let descriptor = FieldDescriptor::new(name, TypeTag::Custom(short_type_name::<T>()), false);
        self.push(descriptor, Arc::new(CustomSlot { get, get_mut }))
    }

    /// Splice in every field of the base model `B`, reached through `base`
    pub fn inherit<B: Model>(
        &mut self,
        base: fn(&M) -> &B,
        base_mut: fn(&mut M) -> &mut B,
    ) -> &mut Self {
        for entry in Schema::<B>::build().entries {
            let mut descriptor = entry.descriptor;
            descriptor.owner_depth += 1;
            self.entries.push(FieldEntry {
                descriptor,
                slot: Arc::new(InheritedSlot {
                    inner: entry.slot,
                    base,
                    base_mut,
                }),
            });
        }
        self
    }

    fn push(&mut self, descriptor: FieldDescriptor, slot: Arc<dyn Slot<M>>) -> &mut Self {
        self.entries.push(FieldEntry { descriptor, slot });
        self
    }

    fn finish(mut self) -> Schema<M> {
        // Stable: registration order survives within a level
        self.entries
            .sort_by(|a, b| b.descriptor.owner_depth.cmp(&a.descriptor.owner_depth));

        // Innermost declaration of each name wins
        let mut keep: Vec<bool> = vec![true; self.entries.len()];
        let mut seen = HashSet::new();
        for (index, entry) in self.entries.iter().enumerate().rev() {
            if !seen.insert(entry.descriptor.name.clone()) {
                log::warn!(
                    "field '{}' registered more than once on {}, keeping the innermost declaration",
                    entry.descriptor.name,
                    short_type_name::<M>()
                );
                keep[index] = false;
            }
        }
        let mut keep = keep.into_iter();
        self.entries.retain(|_| keep.next().unwrap_or(true));

        Schema {
            entries: self.entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Required, Scalar};

    #[derive(Debug, Default, Clone)]
    struct Base {
        id: Required<i64>,
        name: Option<String>,
    }

    impl Model for Base {
        fn describe(schema: &mut SchemaBuilder<Self>) {
            schema
                .field("id", |m| &m.id, |m| &mut m.id)
                .field("name", |m| &m.name, |m| &mut m.name);
        }
    }

    #[derive(Debug, Default, Clone)]
    struct Derived {
        base: Base,
        tags: Vec<String>,
        name: String,
    }

    impl Model for Derived {
        fn describe(schema: &mut SchemaBuilder<Self>) {
            schema
                .field("tags", |m| &m.tags, |m| &mut m.tags)
                .inherit(|m| &m.base, |m| &mut m.base)
                .field("name", |m| &m.name, |m| &mut m.name);
        }
    }

    #[derive(Debug, Default, Clone)]
    struct Leaf {
        derived: Derived,
        extra: bool,
    }

    impl Model for Leaf {
        fn describe(schema: &mut SchemaBuilder<Self>) {
            schema
                .field("extra", |m| &m.extra, |m| &mut m.extra)
                .inherit(|m| &m.derived, |m| &mut m.derived);
        }
    }

    #[test]
    fn test_inherited_fields_come_first() {
        let schema = Schema::<Leaf>::build();
        assert_eq!(schema.field_names(), vec!["id", "tags", "name", "extra"]);

        let depths: Vec<_> = schema.fields().map(|f| f.owner_depth).collect();
        assert_eq!(depths, vec![2, 1, 1, 0]);
    }

    #[test]
    fn test_shadowed_field_keeps_innermost() {
        let schema = Schema::<Derived>::build();
        let name = schema.field("name").unwrap();
        assert_eq!(name.owner_depth, 0);
        assert!(!name.is_optional);
        assert_eq!(name.declared_type, TypeTag::Text);
        assert_eq!(schema.len(), 3);
    }

    #[test]
    fn test_descriptor_metadata() {
        let schema = Schema::<Derived>::build();
        let id = schema.field("id").unwrap();
        assert!(id.is_inherited());
        assert!(!id.is_optional);
        assert_eq!(
            schema.field("tags").unwrap().declared_type,
            TypeTag::List(Scalar::Text)
        );
    }

    #[test]
    fn test_order_is_deterministic() {
        let first = Schema::<Leaf>::build().field_names().join(",");
        let second = Schema::<Leaf>::build().field_names().join(",");
        assert_eq!(first, second);
    }
}
