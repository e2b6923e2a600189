//! Field kinds known to the catalog.

use serde::{Deserialize, Serialize};

/// The declared kind of a model field.
///
/// Reverse relation kinds are synthesized on the target side of a
/// relationship and report the internal type of their forward kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    /// Auto-incrementing 32-bit integer.
    AutoField,
    /// Auto-incrementing 64-bit integer.
    BigAutoField,
    /// Bounded string.
    CharField,
    /// Unbounded text.
    TextField,
    /// Signed integer.
    IntegerField,
    /// Unsigned integer.
    PositiveIntegerField,
    /// Floating point number.
    FloatField,
    /// Boolean flag.
    BooleanField,
    /// Timestamp.
    DateTimeField,
    /// Many-to-one relation to another model.
    ForeignKey,
    /// One-to-one relation to another model.
    OneToOneField,
    /// Many-to-many relation to another model.
    ManyToManyField,
    /// Reverse side of a `ForeignKey`.
    ManyToOneRel,
    /// Reverse side of a `OneToOneField`.
    OneToOneRel,
    /// Reverse side of a `ManyToManyField`.
    ManyToManyRel,
}

impl FieldKind {
    /// The internal type tag.
    pub fn internal_type(&self) -> Option<&'static str> {
        match self {
            FieldKind::AutoField => Some("AutoField"),
            FieldKind::BigAutoField => Some("BigAutoField"),
            FieldKind::CharField => Some("CharField"),
            FieldKind::TextField => Some("TextField"),
            FieldKind::IntegerField => Some("IntegerField"),
            FieldKind::PositiveIntegerField => Some("PositiveIntegerField"),
            FieldKind::FloatField => Some("FloatField"),
            FieldKind::BooleanField => Some("BooleanField"),
            FieldKind::DateTimeField => Some("DateTimeField"),
            FieldKind::ForeignKey | FieldKind::ManyToOneRel => Some("ForeignKey"),
            FieldKind::OneToOneField | FieldKind::OneToOneRel => Some("OneToOneField"),
            FieldKind::ManyToManyField | FieldKind::ManyToManyRel => Some("ManyToManyField"),
        }
    }

    /// Check if this kind relates to another model.
    pub fn is_relation(&self) -> bool {
        matches!(
            self,
            FieldKind::ForeignKey
                | FieldKind::OneToOneField
                | FieldKind::ManyToManyField
                | FieldKind::ManyToOneRel
                | FieldKind::OneToOneRel
                | FieldKind::ManyToManyRel
        )
    }

    /// Check if this kind is the synthesized reverse side of a relation.
    pub fn is_reverse(&self) -> bool {
        matches!(
            self,
            FieldKind::ManyToOneRel | FieldKind::OneToOneRel | FieldKind::ManyToManyRel
        )
    }

    /// The reverse kind for a forward relation kind.
    pub fn reverse(&self) -> Option<FieldKind> {
        match self {
            FieldKind::ForeignKey => Some(FieldKind::ManyToOneRel),
            FieldKind::OneToOneField => Some(FieldKind::OneToOneRel),
            FieldKind::ManyToManyField => Some(FieldKind::ManyToManyRel),
            _ => None,
        }
    }
}
