use std::collections::{HashMap, HashSet};

use graphql_parser::schema as input;
use graphql_parser::schema::{Definition, TypeDefinition, Value};
use tracing::instrument;

static BUILTIN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

const TYPE_DIRECTIVE: &str = "composite__type";
const FIELD_DIRECTIVE: &str = "composite__field";
const LOOKUP_DIRECTIVE: &str = "composite__lookup";

#[derive(Debug, Clone, thiserror::Error)]
pub enum CompositeSchemaError {
    #[error("failed to parse composite schema document: {0}")]
    Syntax(String),
    #[error("the composite schema does not define a query root type")]
    MissingQueryType,
    #[error("directive @{directive} on '{location}' is missing the '{argument}' argument")]
    MissingDirectiveArgument {
        directive: String,
        location: String,
        argument: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Object,
    Interface,
    Union,
    Scalar,
    Enum,
}

impl TypeKind {
    /// Leaf types terminate selection sets; composite types require one.
    pub fn is_leaf(&self) -> bool {
        matches!(self, TypeKind::Scalar | TypeKind::Enum)
    }
}

/// A field a source schema exposes to re-enter an entity with key arguments.
#[derive(Debug, Clone)]
pub struct Lookup {
    pub name: String,
}

/// Per-source-schema metadata of a composite type.
#[derive(Debug, Clone, Default)]
pub struct TypeSource {
    pub lookups: Vec<Lookup>,
}

#[derive(Debug, Clone)]
pub struct OutputField {
    pub name: String,
    /// The innermost named type this field resolves to.
    pub type_name: String,
    /// Source schemas able to resolve this field.
    pub sources: HashSet<String>,
}

#[derive(Debug, Clone)]
pub struct CompositeType {
    pub name: String,
    pub kind: TypeKind,
    pub fields: HashMap<String, OutputField>,
    /// Source schemas exposing this type, with their lookups.
    pub sources: HashMap<String, TypeSource>,
}

impl CompositeType {
    pub fn field(&self, name: &str) -> Option<&OutputField> {
        self.fields.get(name)
    }

    /// A type is an entity when at least one source schema can look it up
    /// independently, giving it a cross-schema identity.
    pub fn is_entity(&self) -> bool {
        self.sources.values().any(|source| !source.lookups.is_empty())
    }
}

/// The merged, read-only view over all source schemas.
///
/// Immutable after construction; a single instance may back concurrent
/// planner calls.
#[derive(Debug, Clone)]
pub struct CompositeSchema {
    pub types: HashMap<String, CompositeType>,
    pub query_type: String,
    known_scalars: HashSet<String>,
}

impl CompositeSchema {
    pub fn parse(sdl: &str) -> Result<Self, CompositeSchemaError> {
        let document = graphql_parser::parse_schema::<String>(sdl)
            .map_err(|error| CompositeSchemaError::Syntax(error.to_string()))?;
        Self::new(&document)
    }

    #[instrument(level = "trace", skip_all, name = "new_composite_schema")]
    pub fn new(document: &input::Document<'_, String>) -> Result<Self, CompositeSchemaError> {
        let mut types = HashMap::new();
        let mut known_scalars = HashSet::new();
        let mut query_type = None;

        for definition in &document.definitions {
            match definition {
                Definition::SchemaDefinition(schema_definition) => {
                    query_type = schema_definition.query.clone();
                }
                Definition::TypeDefinition(TypeDefinition::Object(object)) => {
                    let composite_type = Self::build_complex_type(
                        &object.name,
                        TypeKind::Object,
                        &object.directives,
                        &object.fields,
                    )?;
                    types.insert(object.name.clone(), composite_type);
                }
                Definition::TypeDefinition(TypeDefinition::Interface(interface)) => {
                    let composite_type = Self::build_complex_type(
                        &interface.name,
                        TypeKind::Interface,
                        &interface.directives,
                        &interface.fields,
                    )?;
                    types.insert(interface.name.clone(), composite_type);
                }
                Definition::TypeDefinition(TypeDefinition::Union(union)) => {
                    let sources = Self::extract_type_sources(&union.name, &union.directives)?;
                    types.insert(
                        union.name.clone(),
                        CompositeType {
                            name: union.name.clone(),
                            kind: TypeKind::Union,
                            fields: HashMap::new(),
                            sources,
                        },
                    );
                }
                Definition::TypeDefinition(TypeDefinition::Enum(enum_type)) => {
                    types.insert(
                        enum_type.name.clone(),
                        CompositeType {
                            name: enum_type.name.clone(),
                            kind: TypeKind::Enum,
                            fields: HashMap::new(),
                            sources: HashMap::new(),
                        },
                    );
                }
                Definition::TypeDefinition(TypeDefinition::Scalar(scalar)) => {
                    known_scalars.insert(scalar.name.clone());
                    types.insert(
                        scalar.name.clone(),
                        CompositeType {
                            name: scalar.name.clone(),
                            kind: TypeKind::Scalar,
                            fields: HashMap::new(),
                            sources: HashMap::new(),
                        },
                    );
                }
                _ => {}
            }
        }

        let query_type = query_type.unwrap_or_else(|| "Query".to_string());
        if !types.contains_key(&query_type) {
            return Err(CompositeSchemaError::MissingQueryType);
        }

        Ok(CompositeSchema {
            types,
            query_type,
            known_scalars,
        })
    }

    pub fn type_def(&self, name: &str) -> Option<&CompositeType> {
        self.types.get(name)
    }

    pub fn query_type_def(&self) -> Option<&CompositeType> {
        self.types.get(&self.query_type)
    }

    pub fn type_kind(&self, name: &str) -> Option<TypeKind> {
        if let Some(composite_type) = self.types.get(name) {
            return Some(composite_type.kind);
        }

        if BUILTIN_SCALARS.contains(&name) || self.known_scalars.contains(name) {
            return Some(TypeKind::Scalar);
        }

        None
    }

    fn build_complex_type(
        type_name: &str,
        kind: TypeKind,
        directives: &[input::Directive<'_, String>],
        fields: &[input::Field<'_, String>],
    ) -> Result<CompositeType, CompositeSchemaError> {
        let sources = Self::extract_type_sources(type_name, directives)?;
        let type_schemas: HashSet<String> = sources.keys().cloned().collect();

        let mut output_fields = HashMap::new();
        for field in fields {
            let mut field_sources = HashSet::new();
            for directive in &field.directives {
                if directive.name == FIELD_DIRECTIVE {
                    field_sources.insert(Self::schema_argument(
                        directive,
                        &format!("{}.{}", type_name, field.name),
                    )?);
                }
            }

            // A field without an explicit source annotation is exposed by
            // every schema its declaring type lists.
            if field_sources.is_empty() {
                field_sources = type_schemas.clone();
            }

            output_fields.insert(
                field.name.clone(),
                OutputField {
                    name: field.name.clone(),
                    type_name: named_type(&field.field_type).to_string(),
                    sources: field_sources,
                },
            );
        }

        Ok(CompositeType {
            name: type_name.to_string(),
            kind,
            fields: output_fields,
            sources,
        })
    }

    fn extract_type_sources(
        type_name: &str,
        directives: &[input::Directive<'_, String>],
    ) -> Result<HashMap<String, TypeSource>, CompositeSchemaError> {
        let mut sources: HashMap<String, TypeSource> = HashMap::new();

        for directive in directives {
            match directive.name.as_str() {
                TYPE_DIRECTIVE => {
                    let schema = Self::schema_argument(directive, type_name)?;
                    sources.entry(schema).or_default();
                }
                LOOKUP_DIRECTIVE => {
                    let schema = Self::schema_argument(directive, type_name)?;
                    let field = string_argument(directive, "field").ok_or_else(|| {
                        CompositeSchemaError::MissingDirectiveArgument {
                            directive: directive.name.clone(),
                            location: type_name.to_string(),
                            argument: "field".to_string(),
                        }
                    })?;
                    sources
                        .entry(schema)
                        .or_default()
                        .lookups
                        .push(Lookup { name: field });
                }
                _ => {}
            }
        }

        Ok(sources)
    }

    fn schema_argument(
        directive: &input::Directive<'_, String>,
        location: &str,
    ) -> Result<String, CompositeSchemaError> {
        string_argument(directive, "schema").ok_or_else(|| {
            CompositeSchemaError::MissingDirectiveArgument {
                directive: directive.name.clone(),
                location: location.to_string(),
                argument: "schema".to_string(),
            }
        })
    }
}

fn string_argument(directive: &input::Directive<'_, String>, name: &str) -> Option<String> {
    directive
        .arguments
        .iter()
        .find(|(argument_name, _)| argument_name == name)
        .and_then(|(_, value)| match value {
            Value::String(s) => Some(s.clone()),
            Value::Enum(e) => Some(e.clone()),
            _ => None,
        })
}

fn named_type<'a>(field_type: &'a input::Type<'_, String>) -> &'a str {
    match field_type {
        input::Type::NamedType(name) => name,
        input::Type::ListType(inner) => named_type(inner),
        input::Type::NonNullType(inner) => named_type(inner),
    }
}
