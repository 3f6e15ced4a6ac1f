//! The validation engine.

use std::any::Any;
use std::sync::{Arc, OnceLock};

use crate::error::{CompileError, RegistryError};
use crate::executor::Executor;
use crate::options::{OptionsError, ValidationOptions};
use crate::record::Record;
use crate::registry::{FilterRule, RegistrationPolicy, RuleRegistry, ValidatorRule};
use crate::result::{Aggregator, ValidationResult};
use crate::schema::{Schema, SchemaCache, SchemaCompiler, trigger};

/// Validates records against their declared rules.
///
/// A validator owns its options and schema cache and shares a
/// [`RuleRegistry`]. Schemas are compiled once per record type and reused.
///
/// # Examples
///
/// ```rust,ignore
/// use sieve_validator::{Record, Validator};
///
/// #[derive(Record)]
/// struct Signup {
///     #[record(validator = "min(18)|max(65)")]
///     age: u32,
/// }
///
/// let validator = Validator::default();
/// validator.compile::<Signup>()?;
///
/// let mut signup = Signup { age: 16 };
/// let result = validator.validate(&mut signup);
/// assert!(!result.is_valid());
/// ```
#[derive(Debug)]
pub struct Validator {
    registry: Arc<RuleRegistry>,
    options: ValidationOptions,
    cache: SchemaCache,
}

static GLOBAL: OnceLock<Validator> = OnceLock::new();

impl Validator {
    /// Creates a validator on the global registry.
    pub fn new(options: ValidationOptions) -> Result<Self, OptionsError> {
        Self::builder().options(options).build()
    }

    /// Starts building a validator.
    #[must_use]
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::default()
    }

    /// The process-wide validator.
    ///
    /// Uses default options and the global registry unless
    /// [`install_global`](Self::install_global) ran first.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(Self::default)
    }

    /// Installs the process-wide validator. Fails, returning `validator`,
    /// once the global has been initialised.
    pub fn install_global(validator: Self) -> Result<(), Self> {
        GLOBAL.set(validator)
    }

    /// The engine options.
    #[must_use]
    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// The rule registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<RuleRegistry> {
        &self.registry
    }

    /// The schema cache.
    #[must_use]
    pub fn cache(&self) -> &SchemaCache {
        &self.cache
    }

    /// Compiles (or fetches) the schema of `R`.
    ///
    /// Call this at start-up for every record type to surface broken
    /// declarations before any record is validated.
    pub fn compile<R: Record>(&self) -> Result<Arc<Schema>, CompileError> {
        let compiler = SchemaCompiler::new(&self.registry, &self.options);
        self.cache.get_or_compile::<R>(&compiler)
    }

    /// Validates `record` with the default trigger.
    pub fn validate<R: Record>(&self, record: &mut R) -> ValidationResult {
        self.validate_for(record, trigger::ALL)
    }

    /// Validates `record`, running only fields active for `trigger`.
    ///
    /// An empty trigger is treated as `all`.
    pub fn validate_for<R: Record>(&self, record: &mut R, trigger: &str) -> ValidationResult {
        let schema = match self.compile::<R>() {
            Ok(schema) => schema,
            Err(error) => {
                tracing::warn!(
                    record = std::any::type_name::<R>(),
                    %error,
                    "schema compilation failed"
                );
                return Aggregator::default().abort(error.into());
            }
        };
        self.run(&schema, record, trigger)
    }

    fn run(
        &self,
        schema: &Schema,
        record: &mut (dyn Any + 'static),
        trigger: &str,
    ) -> ValidationResult {
        let trigger = trigger::normalize(Some(trigger));
        let executor = Executor::new(schema.type_name(), &self.options);
        let mut errors = Aggregator::default();
        let mut selected = 0_usize;

        for spec in trigger::select(schema, trigger) {
            selected += 1;
            tracing::trace!(field = %spec.path, "running field rules");
            if let Err(error) = executor.run_field(spec, record, &mut errors) {
                tracing::warn!(record = schema.type_name(), %error, "validation aborted");
                return errors.abort(error);
            }
        }

        tracing::debug!(
            record = schema.type_name(),
            trigger,
            selected,
            errors = errors.len(),
            "validated record"
        );
        errors.finish()
    }

    /// Registers a validator, honouring
    /// [`allow_duplicate_rule_registration`](ValidationOptions::allow_duplicate_rule_registration).
    ///
    /// Schemas compiled earlier keep the rules they bound.
    pub fn register_validator(
        &self,
        name: impl Into<String>,
        rule: ValidatorRule,
    ) -> Result<(), RegistryError> {
        let policy = RegistrationPolicy::for_options(&self.options);
        self.registry.register_validator(name, rule, policy)
    }

    /// Registers a filter, honouring
    /// [`allow_duplicate_rule_registration`](ValidationOptions::allow_duplicate_rule_registration).
    pub fn register_filter(
        &self,
        name: impl Into<String>,
        rule: FilterRule,
    ) -> Result<(), RegistryError> {
        let policy = RegistrationPolicy::for_options(&self.options);
        self.registry.register_filter(name, rule, policy)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            registry: RuleRegistry::global(),
            options: ValidationOptions::default(),
            cache: SchemaCache::new(),
        }
    }
}

/// Builder for [`Validator`].
#[derive(Debug, Default)]
pub struct ValidatorBuilder {
    registry: Option<Arc<RuleRegistry>>,
    options: ValidationOptions,
}

impl ValidatorBuilder {
    /// Uses `registry` instead of the global one.
    #[must_use]
    pub fn registry(mut self, registry: Arc<RuleRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Sets the options.
    #[must_use]
    pub fn options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    /// Checks the options and builds the validator.
    pub fn build(self) -> Result<Validator, OptionsError> {
        self.options.check()?;
        Ok(Validator {
            registry: self.registry.unwrap_or_else(RuleRegistry::global),
            options: self.options,
            cache: SchemaCache::new(),
        })
    }
}
