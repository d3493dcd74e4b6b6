//! Typed field accessors
//!
//! A slot is the executable half of a field registration: it reads a field as
//! a [`Native`] and stages a write from one. Writes are staged as closures so
//! that a fill pass can validate every field before touching the model.
//!
//! Copyright (c) 2025 Modelmap Team
//! Licensed under the Apache-2.0 license

use super::value::FieldValue;
use crate::error::CoerceError;
use crate::model::{short_type_name, DynModel, Model};
use crate::native::Native;
use std::any::Any;
use std::sync::Arc;

/// A pending write into a model
pub(crate) type Staged<M> = Box<dyn FnOnce(&mut M)>;

/// Read/stage access to one field of `M`
pub(crate) trait Slot<M>: Send + Sync {
    fn read(&self, model: &M) -> Native;

    fn stage(&self, value: Native) -> Result<Staged<M>, CoerceError>;

    fn has_value(&self, model: &M) -> bool;
}

/// Scalar, optional, required and primitive-list fields
pub(crate) struct ValueSlot<M, T> {
    pub(crate) get: fn(&M) -> &T,
    pub(crate) get_mut: fn(&mut M) -> &mut T,
}

impl<M: 'static, T: FieldValue> Slot<M> for ValueSlot<M, T> {
    fn read(&self, model: &M) -> Native {
        (self.get)(model).to_native()
    }

    fn stage(&self, value: Native) -> Result<Staged<M>, CoerceError> {
        let value = T::from_native(value)?;
        let get_mut = self.get_mut;
        Ok(Box::new(move |model: &mut M| *get_mut(model) = value))
    }

    fn has_value(&self, model: &M) -> bool {
        (self.get)(model).has_value()
    }
}

/// Author-defined values, carried as `Native::Custom`
pub(crate) struct CustomSlot<M, T> {
    pub(crate) get: fn(&M) -> &T,
    pub(crate) get_mut: fn(&mut M) -> &mut T,
}

impl<M: 'static, T: Clone + 'static> Slot<M> for CustomSlot<M, T> {
    fn read(&self, model: &M) -> Native {
        Native::custom((self.get)(model).clone())
    }

    fn stage(&self, value: Native) -> Result<Staged<M>, CoerceError> {
        let value = match value {
            Native::Custom(boxed) => boxed
                .downcast::<T>()
                .map_err(|_| CoerceError::mismatch(short_type_name::<T>(), "custom value of another type"))?,
            other => return Err(CoerceError::mismatch(short_type_name::<T>(), other.kind())),
        };
        let get_mut = self.get_mut;
        Ok(Box::new(move |model: &mut M| *get_mut(model) = *value))
    }

    fn has_value(&self, _model: &M) -> bool {
        true
    }
}

fn downcast_model<N: Model>(model: Box<dyn DynModel>) -> Result<N, CoerceError> {
    model
        .into_any()
        .downcast::<N>()
        .map(|boxed| *boxed)
        .map_err(|_| CoerceError::UnresolvedNestedType {
            type_name: short_type_name::<N>(),
        })
}

/// A nested model held by value
pub(crate) struct NestedSlot<M, N> {
    pub(crate) get: fn(&M) -> &N,
    pub(crate) get_mut: fn(&mut M) -> &mut N,
}

impl<M: 'static, N: Model + Clone> Slot<M> for NestedSlot<M, N> {
    fn read(&self, model: &M) -> Native {
        Native::Model(Box::new((self.get)(model).clone()))
    }

    fn stage(&self, value: Native) -> Result<Staged<M>, CoerceError> {
        let nested = match value {
            Native::Model(model) => downcast_model::<N>(model)?,
            other => return Err(CoerceError::mismatch(TypeName::<N>::model(), other.kind())),
        };
        let get_mut = self.get_mut;
        Ok(Box::new(move |model: &mut M| *get_mut(model) = nested))
    }

    fn has_value(&self, _model: &M) -> bool {
        true
    }
}

/// A nested model that may be absent
pub(crate) struct OptionalNestedSlot<M, N> {
    pub(crate) get: fn(&M) -> &Option<N>,
    pub(crate) get_mut: fn(&mut M) -> &mut Option<N>,
}

impl<M: 'static, N: Model + Clone> Slot<M> for OptionalNestedSlot<M, N> {
    fn read(&self, model: &M) -> Native {
        match (self.get)(model) {
            Some(nested) => Native::Model(Box::new(nested.clone())),
            None => Native::Null,
        }
    }

    fn stage(&self, value: Native) -> Result<Staged<M>, CoerceError> {
        let nested = match value {
            Native::Null => None,
            Native::Model(model) => Some(downcast_model::<N>(model)?),
            other => return Err(CoerceError::mismatch(TypeName::<N>::model(), other.kind())),
        };
        let get_mut = self.get_mut;
        Ok(Box::new(move |model: &mut M| *get_mut(model) = nested))
    }

    fn has_value(&self, model: &M) -> bool {
        (self.get)(model).is_some()
    }
}

/// A sequence of nested models
pub(crate) struct NestedListSlot<M, N> {
    pub(crate) get: fn(&M) -> &Vec<N>,
    pub(crate) get_mut: fn(&mut M) -> &mut Vec<N>,
}

impl<M: 'static, N: Model + Clone> Slot<M> for NestedListSlot<M, N> {
    fn read(&self, model: &M) -> Native {
        Native::Models(
            (self.get)(model)
                .iter()
                .map(|nested| Box::new(nested.clone()) as Box<dyn DynModel>)
                .collect(),
        )
    }

    fn stage(&self, value: Native) -> Result<Staged<M>, CoerceError> {
        let list = match value {
            Native::Models(models) => models
                .into_iter()
                .map(downcast_model::<N>)
                .collect::<Result<Vec<N>, _>>()?,
            other => return Err(CoerceError::mismatch(TypeName::<N>::list(), other.kind())),
        };
        let get_mut = self.get_mut;
        Ok(Box::new(move |model: &mut M| *get_mut(model) = list))
    }

    /// A list always holds a value, even an empty one
    fn has_value(&self, _model: &M) -> bool {
        true
    }
}

/// A field of a base model, reached through the derived model
pub(crate) struct InheritedSlot<M, B> {
    pub(crate) inner: Arc<dyn Slot<B>>,
    pub(crate) base: fn(&M) -> &B,
    pub(crate) base_mut: fn(&mut M) -> &mut B,
}

impl<M: 'static, B: 'static> Slot<M> for InheritedSlot<M, B> {
    fn read(&self, model: &M) -> Native {
        self.inner.read((self.base)(model))
    }

    fn stage(&self, value: Native) -> Result<Staged<M>, CoerceError> {
        let staged = self.inner.stage(value)?;
        let base_mut = self.base_mut;
        Ok(Box::new(move |model: &mut M| staged(base_mut(model))))
    }

    fn has_value(&self, model: &M) -> bool {
        self.inner.has_value((self.base)(model))
    }
}

struct TypeName<N>(std::marker::PhantomData<N>);

impl<N: Any> TypeName<N> {
    fn model() -> String {
        format!("model {}", short_type_name::<N>())
    }

    fn list() -> String {
        format!("list of model {}", short_type_name::<N>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SchemaBuilder;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Inner {
        label: Option<String>,
    }

    impl Model for Inner {
        fn describe(schema: &mut SchemaBuilder<Self>) {
            schema.field("label", |m| &m.label, |m| &mut m.label);
        }
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Other;

    impl Model for Other {
        fn describe(_schema: &mut SchemaBuilder<Self>) {}
    }

    #[derive(Default)]
    struct Outer {
        count: i64,
        inner: Inner,
        items: Vec<Inner>,
    }

    #[test]
    fn test_value_slot_stages_without_writing() {
        let slot = ValueSlot::<Outer, i64> {
            get: |m| &m.count,
            get_mut: |m| &mut m.count,
        };
        let mut outer = Outer::default();
        let write = slot.stage(Native::Int(5)).unwrap();
        assert_eq!(outer.count, 0);
        write(&mut outer);
        assert_eq!(outer.count, 5);
        assert!(slot.stage(Native::Text("five".into())).is_err());
    }

    #[test]
    fn test_nested_slot_rejects_other_model_types() {
        let slot = NestedSlot::<Outer, Inner> {
            get: |m| &m.inner,
            get_mut: |m| &mut m.inner,
        };
        let err = slot.stage(Native::Model(Box::new(Other))).err().unwrap();
        assert!(matches!(err, CoerceError::UnresolvedNestedType { type_name: "Inner" }));
    }

    #[test]
    fn test_nested_list_holds_a_value_even_when_empty() {
        let slot = NestedListSlot::<Outer, Inner> {
            get: |m| &m.items,
            get_mut: |m| &mut m.items,
        };
        let mut outer = Outer::default();
        assert!(slot.has_value(&outer));
        let write = slot
            .stage(Native::Models(vec![Box::new(Inner::default())]))
            .unwrap();
        write(&mut outer);
        assert_eq!(outer.items.len(), 1);
        assert!(slot.has_value(&outer));

        let write = slot.stage(Native::Models(Vec::new())).unwrap();
        write(&mut outer);
        assert!(outer.items.is_empty());
        assert!(slot.has_value(&outer));
    }
}
