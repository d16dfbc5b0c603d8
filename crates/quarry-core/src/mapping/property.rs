use crate::stmt::{Type, Value};

use std::{fmt, sync::Arc};

/// Produces the default value of a property. Evaluated each time a record
/// is constructed, so defaults such as "now" reflect the time of use.
pub type DefaultValue = Arc<dyn Fn() -> Value + Send + Sync>;

/// Whether a property is read from, written to, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Selected but never inserted or updated.
    ReadOnly,

    /// Inserted and updated but never selected.
    WriteOnly,

    #[default]
    ReadWrite,
}

/// Relation from the owning class to another mapped class.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Relation {
    #[default]
    None,

    /// Many rows of the owning class point at one row of `target`. Stored
    /// as a foreign key column on the owning table.
    ManyToOne { target: String },

    /// Rows on both sides relate to many rows on the other. Stored in a
    /// join table; the owning table gets no column.
    ManyToMany { target: String },

    /// A single reference to one row of `target`. Stored as a foreign key
    /// column on the owning table.
    Reference { target: String },
}

/// How one property of a mapped class corresponds to a column.
#[derive(Clone)]
pub struct PropertyMapping {
    pub(crate) property: String,
    pub(crate) column: Option<String>,
    pub(crate) ty: Type,
    pub(crate) max_length: Option<u64>,
    pub(crate) default: Option<DefaultValue>,
    pub(crate) mode: Mode,
    pub(crate) relation: Relation,
    pub(crate) cascade: bool,
    pub(crate) not_null: bool,
    pub(crate) unique: bool,
    pub(crate) indexed: bool,
    pub(crate) identity: bool,
    pub(crate) auto_increment: bool,
}

impl Relation {
    /// Class name of the related mapping.
    pub fn target(&self) -> Option<&str> {
        match self {
            Relation::None => None,
            Relation::ManyToOne { target }
            | Relation::ManyToMany { target }
            | Relation::Reference { target } => Some(target),
        }
    }

    /// True for relations stored as a foreign key column on the owning
    /// table.
    pub fn is_foreign_key(&self) -> bool {
        matches!(self, Relation::ManyToOne { .. } | Relation::Reference { .. })
    }

    pub fn is_many_to_many(&self) -> bool {
        matches!(self, Relation::ManyToMany { .. })
    }
}

impl PropertyMapping {
    /// Maps a plain property to a column of the same name.
    pub fn new(property: impl Into<String>, ty: Type) -> PropertyMapping {
        PropertyMapping {
            property: property.into(),
            column: None,
            ty,
            max_length: None,
            default: None,
            mode: Mode::ReadWrite,
            relation: Relation::None,
            cascade: false,
            not_null: false,
            unique: false,
            indexed: false,
            identity: false,
            auto_increment: false,
        }
    }

    /// Maps a many-to-one relation. The column defaults to
    /// `{property}_{target identity column}` and takes the type of the
    /// target's identity once the registry is verified.
    pub fn many_to_one(property: impl Into<String>, target: impl Into<String>) -> PropertyMapping {
        PropertyMapping::with_relation(
            property,
            Relation::ManyToOne {
                target: target.into(),
            },
        )
    }

    pub fn many_to_many(property: impl Into<String>, target: impl Into<String>) -> PropertyMapping {
        PropertyMapping::with_relation(
            property,
            Relation::ManyToMany {
                target: target.into(),
            },
        )
    }

    pub fn reference(property: impl Into<String>, target: impl Into<String>) -> PropertyMapping {
        PropertyMapping::with_relation(
            property,
            Relation::Reference {
                target: target.into(),
            },
        )
    }

    fn with_relation(property: impl Into<String>, relation: Relation) -> PropertyMapping {
        PropertyMapping {
            relation,
            ..PropertyMapping::new(property, Type::I64)
        }
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn max_length(mut self, max_length: u64) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn default_value(mut self, default: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        self.default = Some(Arc::new(default));
        self
    }

    pub fn read_only(mut self) -> Self {
        self.mode = Mode::ReadOnly;
        self
    }

    pub fn write_only(mut self) -> Self {
        self.mode = Mode::WriteOnly;
        self
    }

    /// Deleting the related row deletes this row as well. On a many-to-many
    /// relation the join rows are always removed with either side.
    pub fn cascade(mut self) -> Self {
        self.cascade = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    /// Name of the column backing this property.
    ///
    /// Relation columns without an explicit name are derived when the
    /// owning registry is verified; until then the property name is
    /// returned.
    pub fn column_name(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.property)
    }

    pub fn ty(&self) -> Type {
        self.ty
    }

    pub fn length(&self) -> Option<u64> {
        self.max_length
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn relation(&self) -> &Relation {
        &self.relation
    }

    pub fn is_cascade(&self) -> bool {
        self.cascade
    }

    /// Identity columns are never nullable.
    pub fn is_not_null(&self) -> bool {
        self.not_null || self.identity
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn is_indexed(&self) -> bool {
        self.indexed
    }

    pub fn is_identity(&self) -> bool {
        self.identity
    }

    pub fn is_auto_increment(&self) -> bool {
        self.auto_increment
    }

    /// False for many-to-many relations, which live in a join table.
    pub fn has_column(&self) -> bool {
        !self.relation.is_many_to_many()
    }

    pub fn is_readable(&self) -> bool {
        self.has_column() && self.mode != Mode::WriteOnly
    }

    pub fn is_writable(&self) -> bool {
        self.has_column() && self.mode != Mode::ReadOnly
    }

    /// Evaluates the default thunk.
    pub fn eval_default(&self) -> Option<Value> {
        self.default.as_ref().map(|default| default())
    }

    pub(crate) fn has_explicit_column(&self) -> bool {
        self.column.is_some()
    }
}

impl fmt::Debug for PropertyMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyMapping")
            .field("property", &self.property)
            .field("column", &self.column_name())
            .field("ty", &self.ty)
            .field("max_length", &self.max_length)
            .field("default", &self.default.as_ref().map(|_| ".."))
            .field("mode", &self.mode)
            .field("relation", &self.relation)
            .field("cascade", &self.cascade)
            .field("identity", &self.identity)
            .field("auto_increment", &self.auto_increment)
            .finish()
    }
}
