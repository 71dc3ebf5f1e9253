use crate::schema::types::field::{FieldDescriptor, FieldKind};

/// Static, declarative field table for one record kind.
///
/// A schema may extend a parent: its fields are the parent's fields followed
/// by its own, where an own field replaces a parent field of the same name in
/// place.
#[derive(Debug)]
pub struct Schema {
    pub name: &'static str,
    pub parent: Option<&'static Schema>,
    pub fields: &'static [FieldDescriptor],
}

impl Schema {
    pub const fn new(name: &'static str, fields: &'static [FieldDescriptor]) -> Self {
        Self {
            name,
            parent: None,
            fields,
        }
    }

    pub const fn extends(
        name: &'static str,
        parent: &'static Schema,
        fields: &'static [FieldDescriptor],
    ) -> Self {
        Self {
            name,
            parent: Some(parent),
            fields,
        }
    }

    /// All descriptors in declaration order, parents first.
    pub fn descriptors(&self) -> Vec<FieldDescriptor> {
        let mut all = match self.parent {
            Some(parent) => parent.descriptors(),
            None => Vec::new(),
        };
        for field in self.fields {
            match all.iter_mut().find(|d| d.name == field.name) {
                Some(existing) => *existing = *field,
                None => all.push(*field),
            }
        }
        all
    }

    pub fn descriptor(&self, name: &str) -> Option<FieldDescriptor> {
        self.fields
            .iter()
            .find(|d| d.name == name)
            .copied()
            .or_else(|| self.parent.and_then(|p| p.descriptor(name)))
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.descriptor(name).is_some()
    }

    fn names_where(&self, pred: impl Fn(&FieldKind) -> bool) -> Vec<&'static str> {
        self.descriptors()
            .into_iter()
            .filter(|d| pred(&d.kind))
            .map(|d| d.name)
            .collect()
    }

    pub fn all_field_names(&self) -> Vec<&'static str> {
        self.names_where(|_| true)
    }

    /// Fields holding nested parameter objects.
    pub fn param_fields(&self) -> Vec<&'static str> {
        self.names_where(FieldKind::is_params)
    }

    pub fn boolean_fields(&self) -> Vec<&'static str> {
        self.names_where(|k| matches!(k, FieldKind::Boolean))
    }

    pub fn number_fields(&self) -> Vec<&'static str> {
        self.names_where(FieldKind::is_number)
    }

    pub fn string_fields(&self) -> Vec<&'static str> {
        self.names_where(|k| matches!(k, FieldKind::String))
    }
}
