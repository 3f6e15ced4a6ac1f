//! Record shape to schema compilation.

use std::any::TypeId;

use smallvec::{SmallVec, smallvec};

use super::spec::{BoundRule, FieldFlag, FieldSpec};
use super::{Schema, trigger};
use crate::error::{CompileError, RuleKind};
use crate::options::ValidationOptions;
use crate::parser::{self, RuleDeclaration};
use crate::record::{FieldAccess, FieldDecl, LeafAccess, Project, Record, RecordShape};
use crate::registry::{Rule, RuleRegistry};
use crate::value::ValueKind;

/// A record level waiting to be compiled.
struct Pending {
    shape: RecordShape,
    prefix: String,
    route: SmallVec<[Project; 2]>,
}

/// Compiles record shapes against a registry and a set of options.
///
/// Compilation is a pure function of the record type, the registry contents
/// and the options: compiling the same type twice yields equal schemas.
#[derive(Debug, Clone, Copy)]
pub struct SchemaCompiler<'a> {
    registry: &'a RuleRegistry,
    options: &'a ValidationOptions,
}

impl<'a> SchemaCompiler<'a> {
    /// Creates a compiler.
    #[must_use]
    pub fn new(registry: &'a RuleRegistry, options: &'a ValidationOptions) -> Self {
        Self { registry, options }
    }

    /// Compiles the schema of `R`.
    pub fn compile<R: Record>(&self) -> Result<Schema, CompileError> {
        self.compile_shape(TypeId::of::<R>(), R::shape())
    }

    /// Compiles an already-built root shape.
    ///
    /// Nested records are flattened with an explicit stack: a record's direct
    /// leaf fields come first, then each nested record in declaration order,
    /// depth first.
    pub fn compile_shape(
        &self,
        type_id: TypeId,
        root: RecordShape,
    ) -> Result<Schema, CompileError> {
        let record = root.type_name;
        let mut fields = Vec::new();
        let mut stack = vec![Pending {
            shape: root,
            prefix: String::new(),
            route: SmallVec::new(),
        }];

        while let Some(pending) = stack.pop() {
            let mut nested = Vec::new();

            for decl in &pending.shape.fields {
                let path = qualify(&pending.prefix, decl.name);
                match decl.access {
                    FieldAccess::Leaf(leaf) => {
                        let spec = self.compile_leaf(record, decl, leaf, path, &pending.route)?;
                        fields.extend(spec);
                    }
                    FieldAccess::Nested(access) => {
                        if let Some(tag) = self.rule_tag(decl) {
                            return Err(CompileError::TagOnNested {
                                record,
                                field: path,
                                tag: tag.to_owned(),
                            });
                        }
                        let mut route = pending.route.clone();
                        route.push(access.project);
                        nested.push(Pending {
                            shape: (access.shape)(),
                            prefix: path,
                            route,
                        });
                    }
                }
            }

            stack.extend(nested.into_iter().rev());
        }

        tracing::debug!(record, fields = fields.len(), "compiled record schema");
        Ok(Schema::new(record, type_id, fields))
    }

    /// First configured tag key present on `decl`, if any.
    fn rule_tag(&self, decl: &FieldDecl) -> Option<&str> {
        let tags = &self.options.tag_names;
        [
            &tags.validator,
            &tags.filter,
            &tags.trigger,
            &tags.message,
            &tags.label,
            &tags.flags,
        ]
        .into_iter()
        .map(String::as_str)
        .find(|key| decl.tag(key).is_some())
    }

    fn compile_leaf(
        &self,
        record: &'static str,
        decl: &FieldDecl,
        leaf: LeafAccess,
        path: String,
        route: &SmallVec<[Project; 2]>,
    ) -> Result<Option<FieldSpec>, CompileError> {
        let tags = &self.options.tag_names;
        let validator_source = decl.tag(&tags.validator);
        let filter_source = decl.tag(&tags.filter);
        if validator_source.is_none() && filter_source.is_none() {
            return Ok(None);
        }

        let site = Site {
            record,
            path: &path,
            value_kind: leaf.kind,
        };
        let validators = match validator_source {
            Some(source) => site.bind(RuleKind::Validator, source, |name| {
                self.registry.validator(name)
            })?,
            None => Vec::new(),
        };
        let filters = match filter_source {
            Some(source) => site.bind(RuleKind::Filter, source, |name| self.registry.filter(name))?,
            None => Vec::new(),
        };

        let triggers = match decl.tag(&tags.trigger) {
            Some(source) => {
                let triggers: SmallVec<[String; 2]> =
                    parser::parse_list(source).map(str::to_owned).collect();
                if triggers.is_empty() {
                    return Err(CompileError::EmptyTriggers { record, field: path });
                }
                triggers
            }
            None => smallvec![trigger::ALL.to_owned()],
        };

        let mut flags: SmallVec<[FieldFlag; 1]> = SmallVec::new();
        if let Some(source) = decl.tag(&tags.flags) {
            for name in source.split('|').map(str::trim).filter(|s| !s.is_empty()) {
                let flag: FieldFlag = name.parse().map_err(|()| CompileError::UnknownFlag {
                    record,
                    field: path.clone(),
                    flag: name.to_owned(),
                })?;
                if !flags.contains(&flag) {
                    flags.push(flag);
                }
            }
        }

        let label = match decl.tag(&tags.label) {
            Some(label) => label.to_owned(),
            None if self.options.use_qualified_field_names_as_labels => path.clone(),
            None => decl.name.to_owned(),
        };

        Ok(Some(FieldSpec {
            name: decl.name,
            type_name: leaf.type_name,
            kind: leaf.kind,
            shape: leaf.shape,
            validators,
            filters,
            label,
            message: decl.tag(&tags.message).map(str::to_owned),
            triggers,
            flags,
            zero: (leaf.zero)(),
            route: route.clone(),
            locate: leaf.locate,
            path,
        }))
    }
}

/// The field a chain is being bound for.
struct Site<'p> {
    record: &'static str,
    path: &'p str,
    value_kind: ValueKind,
}

impl Site<'_> {
    /// Parses a chain and binds every declaration eagerly.
    fn bind<F: ?Sized>(
        &self,
        kind: RuleKind,
        source: &str,
        lookup: impl Fn(&str) -> Option<Rule<F>>,
    ) -> Result<Vec<BoundRule<F>>, CompileError> {
        let Self {
            record,
            path,
            value_kind,
        } = *self;
        let chain = parser::parse_chain(source).map_err(|source| CompileError::Declaration {
            record,
            field: path.to_owned(),
            kind,
            source,
        })?;

        chain
            .into_iter()
            .map(|RuleDeclaration { name, args }| {
                let Some(rule) = lookup(&name) else {
                    return Err(CompileError::UnknownRule {
                        record,
                        field: path.to_owned(),
                        kind,
                        name,
                    });
                };
                if !rule.arity().admits(args.len()) {
                    return Err(CompileError::Arity {
                        record,
                        field: path.to_owned(),
                        kind,
                        name,
                        expected: rule.arity(),
                        found: args.len(),
                    });
                }
                if !rule.accepts(value_kind) {
                    return Err(CompileError::UnsupportedKind {
                        record,
                        field: path.to_owned(),
                        kind,
                        name,
                        value_kind,
                    });
                }
                Ok(BoundRule { name, args, rule })
            })
            .collect()
    }
}

fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{prefix}.{name}")
    }
}
