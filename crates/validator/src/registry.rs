//! Rule registry: named validators and filters.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::context::ValidationContext;
use crate::error::{RegistryError, RuleFault, RuleKind};
use crate::options::ValidationOptions;
use crate::value::{Value, ValueKind};

/// Validator body: `Ok(true)` passes, `Ok(false)` fails, `Err` is a fault.
pub type ValidatorFn = dyn Fn(&mut ValidationContext<'_>) -> Result<bool, RuleFault> + Send + Sync;

/// Filter body: returns the field's new value (`None` keeps or sets null).
pub type FilterFn =
    dyn Fn(&mut ValidationContext<'_>) -> Result<Option<Value>, RuleFault> + Send + Sync;

// ============================================================================
// ARITY
// ============================================================================

/// Accepted number of static arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Arity {
    min: usize,
    max: Option<usize>,
}

impl Arity {
    /// Any number of arguments.
    pub const ANY: Self = Self { min: 0, max: None };

    /// No arguments.
    pub const NONE: Self = Self::exact(0);

    /// Exactly `n` arguments.
    #[must_use]
    pub const fn exact(n: usize) -> Self {
        Self { min: n, max: Some(n) }
    }

    /// `min` or more arguments.
    #[must_use]
    pub const fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    /// Between `min` and `max` arguments, inclusive.
    #[must_use]
    pub const fn range(min: usize, max: usize) -> Self {
        Self { min, max: Some(max) }
    }

    /// Whether `count` arguments are acceptable.
    #[must_use]
    pub fn admits(self, count: usize) -> bool {
        count >= self.min && self.max.is_none_or(|max| count <= max)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (0, None) => f.write_str("any number of"),
            (min, None) => write!(f, "at least {min}"),
            (min, Some(max)) if min == max => write!(f, "{min}"),
            (min, Some(max)) => write!(f, "{min} to {max}"),
        }
    }
}

// ============================================================================
// RULE
// ============================================================================

/// A registered callable plus the metadata checked at compile time.
pub struct Rule<F: ?Sized> {
    func: Arc<F>,
    arity: Arity,
    kinds: Option<&'static [ValueKind]>,
}

/// A registered validator.
pub type ValidatorRule = Rule<ValidatorFn>;

/// A registered filter.
pub type FilterRule = Rule<FilterFn>;

impl Rule<ValidatorFn> {
    /// Wraps a validator body. Accepts any arity and any kind until narrowed.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&mut ValidationContext<'_>) -> Result<bool, RuleFault> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            arity: Arity::ANY,
            kinds: None,
        }
    }
}

impl Rule<FilterFn> {
    /// Wraps a filter body. Accepts any arity and any kind until narrowed.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&mut ValidationContext<'_>) -> Result<Option<Value>, RuleFault>
            + Send
            + Sync
            + 'static,
    {
        Self {
            func: Arc::new(func),
            arity: Arity::ANY,
            kinds: None,
        }
    }
}

impl<F: ?Sized> Rule<F> {
    /// Restricts the number of static arguments.
    #[must_use]
    pub fn with_arity(mut self, arity: Arity) -> Self {
        self.arity = arity;
        self
    }

    /// Restricts the field kinds the rule can be declared on.
    #[must_use]
    pub fn accepting(mut self, kinds: &'static [ValueKind]) -> Self {
        self.kinds = Some(kinds);
        self
    }

    /// Declared arity.
    #[must_use]
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Whether the rule can run on fields of `kind`.
    #[must_use]
    pub fn accepts(&self, kind: ValueKind) -> bool {
        self.kinds.is_none_or(|kinds| kinds.contains(&kind))
    }

    /// The callable.
    #[must_use]
    pub fn func(&self) -> &F {
        &self.func
    }

    /// Whether two handles point at the same callable.
    #[must_use]
    pub fn same_callable(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl<F: ?Sized> Clone for Rule<F> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
            arity: self.arity,
            kinds: self.kinds,
        }
    }
}

impl<F: ?Sized> fmt::Debug for Rule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("arity", &self.arity)
            .field("kinds", &self.kinds)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// What to do when a name is registered twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegistrationPolicy {
    /// Refuse with [`RegistryError::Duplicate`].
    #[default]
    Reject,
    /// Replace the existing rule and log a warning.
    Replace,
}

impl RegistrationPolicy {
    /// Policy implied by [`ValidationOptions::allow_duplicate_rule_registration`].
    #[must_use]
    pub fn for_options(options: &ValidationOptions) -> Self {
        if options.allow_duplicate_rule_registration {
            Self::Replace
        } else {
            Self::Reject
        }
    }
}

/// Thread-safe registry of validators and filters.
///
/// Validators and filters live in separate partitions, so the same name may
/// exist in both. Registration is meant for an application's start-up phase;
/// call [`freeze`](Self::freeze) once it is over to turn later registrations
/// into errors.
///
/// # Examples
///
/// ```rust,ignore
/// use sieve_validator::{RegistrationPolicy, RuleRegistry, ValidatorRule};
///
/// let registry = RuleRegistry::with_builtins();
/// registry.register_validator(
///     "even",
///     ValidatorRule::new(|ctx| Ok(ctx.value().and_then(|v| v.as_i128()).is_none_or(|n| n % 2 == 0))),
///     RegistrationPolicy::Reject,
/// )?;
/// registry.freeze();
/// ```
pub struct RuleRegistry {
    validators: DashMap<String, ValidatorRule>,
    filters: DashMap<String, FilterRule>,
    frozen: AtomicBool,
}

static GLOBAL: LazyLock<Arc<RuleRegistry>> =
    LazyLock::new(|| Arc::new(RuleRegistry::with_builtins()));

impl RuleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            validators: DashMap::new(),
            filters: DashMap::new(),
            frozen: AtomicBool::new(false),
        }
    }

    /// Creates a registry pre-populated with the built-in rules.
    #[must_use]
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        for (name, rule) in crate::rules::validators() {
            registry.validators.insert(name.to_owned(), rule);
        }
        for (name, rule) in crate::rules::filters() {
            registry.filters.insert(name.to_owned(), rule);
        }
        tracing::debug!(
            validators = registry.validators.len(),
            filters = registry.filters.len(),
            "installed built-in rules"
        );
        registry
    }

    /// The process-wide registry, built with the built-in rules on first use.
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    /// Registers a validator.
    pub fn register_validator(
        &self,
        name: impl Into<String>,
        rule: ValidatorRule,
        policy: RegistrationPolicy,
    ) -> Result<(), RegistryError> {
        self.insert(&self.validators, RuleKind::Validator, name.into(), rule, policy)
    }

    /// Registers a filter.
    pub fn register_filter(
        &self,
        name: impl Into<String>,
        rule: FilterRule,
        policy: RegistrationPolicy,
    ) -> Result<(), RegistryError> {
        self.insert(&self.filters, RuleKind::Filter, name.into(), rule, policy)
    }

    fn insert<F: ?Sized>(
        &self,
        map: &DashMap<String, Rule<F>>,
        kind: RuleKind,
        name: String,
        rule: Rule<F>,
        policy: RegistrationPolicy,
    ) -> Result<(), RegistryError> {
        if self.is_frozen() {
            return Err(RegistryError::Frozen { kind, name });
        }
        if !is_valid_name(&name) {
            return Err(RegistryError::InvalidName { name });
        }

        match map.entry(name) {
            Entry::Occupied(mut entry) => match policy {
                RegistrationPolicy::Reject => Err(RegistryError::Duplicate {
                    kind,
                    name: entry.key().clone(),
                }),
                RegistrationPolicy::Replace => {
                    tracing::warn!(rule = %entry.key(), %kind, "replaced registered rule");
                    entry.insert(rule);
                    Ok(())
                }
            },
            Entry::Vacant(entry) => {
                tracing::info!(rule = %entry.key(), %kind, "registered rule");
                entry.insert(rule);
                Ok(())
            }
        }
    }

    /// Looks up a validator.
    #[must_use]
    pub fn validator(&self, name: &str) -> Option<ValidatorRule> {
        self.validators.get(name).map(|entry| entry.value().clone())
    }

    /// Looks up a filter.
    #[must_use]
    pub fn filter(&self, name: &str) -> Option<FilterRule> {
        self.filters.get(name).map(|entry| entry.value().clone())
    }

    /// Whether a validator named `name` exists.
    #[must_use]
    pub fn contains_validator(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// Whether a filter named `name` exists.
    #[must_use]
    pub fn contains_filter(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Sorted validator names.
    #[must_use]
    pub fn validator_names(&self) -> Vec<String> {
        sorted_keys(&self.validators)
    }

    /// Sorted filter names.
    #[must_use]
    pub fn filter_names(&self) -> Vec<String> {
        sorted_keys(&self.filters)
    }

    /// Ends the registration phase. Idempotent.
    pub fn freeze(&self) {
        if !self.frozen.swap(true, Ordering::AcqRel) {
            tracing::info!(
                validators = self.validators.len(),
                filters = self.filters.len(),
                "rule registry frozen"
            );
        }
    }

    /// Whether [`freeze`](Self::freeze) has been called.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("validators", &self.validators.len())
            .field("filters", &self.filters.len())
            .field("frozen", &self.is_frozen())
            .finish()
    }
}

/// A name must survive the declaration parser as a single bare token.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '|' | '(' | ')' | ','))
}

fn sorted_keys<V>(map: &DashMap<String, V>) -> Vec<String> {
    let mut keys: Vec<String> = map.iter().map(|entry| entry.key().clone()).collect();
    keys.sort_unstable();
    keys
}
