//! Operation registry: per operation, the library entries that implement it.
//!
//! The registry is a sparse table. Operations are declared first, then each
//! library that supports an operation registers one entry holding its callable
//! and its own copy of the input. Built once at startup, read-only afterwards.

use std::collections::BTreeSet;
use std::fmt;
use std::hint::black_box;
use std::marker::PhantomData;

use tracing::{debug, trace};

use crate::error::RegistryError;
use crate::observe::{Observe, ObserveFailure};
use crate::types::{Library, OperationFamily, OperationName, Projected, Projection};

/// One library's implementation of an operation, type-erased.
pub trait Candidate: Send + Sync {
    /// Library this entry exercises.
    fn library(&self) -> Library;

    /// Run one timed unit of work. Results go through `black_box` and are dropped.
    fn invoke(&self);

    /// Call once on the probe input and project the result.
    fn observe(&self, projection: Projection) -> Result<Projected, ObserveFailure>;

    /// Call once on every batch input and project each result, in batch order.
    /// Empty when the entry times single calls.
    fn observe_batch(&self, projection: Projection) -> Result<Vec<Projected>, ObserveFailure>;

    /// Short description of the input, for logs and report metadata.
    fn describe_input(&self) -> String;
}

/// A library entry: callable plus the input it is applied to.
///
/// `input` is the probe used by the equivalence check. When a `batch` is set,
/// one timed unit applies the callable to every batch element instead.
pub struct LibraryEntry<I, O, F> {
    library: Library,
    input: I,
    batch: Vec<I>,
    func: F,
    _output: PhantomData<fn() -> O>,
}

impl<I, O, F> LibraryEntry<I, O, F>
where
    F: Fn(&I) -> O,
{
    /// Create a new entry.
    pub fn new(library: Library, input: I, func: F) -> Self {
        Self {
            library,
            input,
            batch: Vec::new(),
            func,
            _output: PhantomData,
        }
    }

    /// Time the callable over a fixed list of inputs per unit.
    pub fn with_batch(mut self, batch: impl IntoIterator<Item = I>) -> Self {
        self.batch = batch.into_iter().collect();
        self
    }
}

/// Entry for operations that take no input, such as reading the clock.
pub fn nullary<O, F>(library: Library, func: F) -> LibraryEntry<(), O, impl Fn(&()) -> O>
where
    F: Fn() -> O,
{
    LibraryEntry::new(library, (), move |_: &()| func())
}

impl<I, O, F> Candidate for LibraryEntry<I, O, F>
where
    I: fmt::Debug + Send + Sync,
    O: Observe,
    F: Fn(&I) -> O + Send + Sync,
{
    fn library(&self) -> Library {
        self.library
    }

    fn invoke(&self) {
        if self.batch.is_empty() {
            black_box((self.func)(black_box(&self.input)));
        } else {
            for input in &self.batch {
                black_box((self.func)(black_box(input)));
            }
        }
    }

    fn observe(&self, projection: Projection) -> Result<Projected, ObserveFailure> {
        (self.func)(&self.input).observe(projection)
    }

    fn observe_batch(&self, projection: Projection) -> Result<Vec<Projected>, ObserveFailure> {
        self.batch
            .iter()
            .map(|input| (self.func)(input).observe(projection))
            .collect()
    }

    fn describe_input(&self) -> String {
        if self.batch.is_empty() {
            format!("{:?}", self.input)
        } else {
            format!("{:?}", self.batch)
        }
    }
}

/// An abstract date/time operation and its registered library entries.
pub struct Operation {
    name: OperationName,
    projection: Projection,
    family: OperationFamily,
    description: &'static str,
    entries: Vec<Box<dyn Candidate>>,
    /// Every library that registered, including disabled ones that were dropped.
    registered: BTreeSet<Library>,
}

impl Operation {
    pub fn name(&self) -> &OperationName {
        &self.name
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn family(&self) -> OperationFamily {
        self.family
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    /// Entries in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &dyn Candidate> + Clone {
        self.entries.iter().map(|entry| entry.as_ref())
    }

    /// Libraries registered for this operation, in registration order.
    pub fn libraries(&self) -> impl Iterator<Item = Library> + '_ {
        self.entries.iter().map(|entry| entry.library())
    }

    /// Entry for a single library, if registered.
    pub fn entry(&self, library: Library) -> Option<&dyn Candidate> {
        self.entries()
            .find(|entry| entry.library() == library)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("projection", &self.projection)
            .field("family", &self.family)
            .field("libraries", &self.libraries().collect::<Vec<_>>())
            .finish()
    }
}

/// Sparse registry of operations, in declaration order.
#[derive(Debug, Default)]
pub struct OperationRegistry {
    operations: Vec<Operation>,
    /// Libraries allowed to register. `None` admits every library.
    enabled: Option<BTreeSet<Library>>,
}

impl OperationRegistry {
    /// Create a new empty registry admitting every library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry that silently skips entries of libraries outside `enabled`.
    pub fn with_libraries(enabled: impl IntoIterator<Item = Library>) -> Self {
        Self {
            operations: Vec::new(),
            enabled: Some(enabled.into_iter().collect()),
        }
    }

    /// Declare an operation. Fails if the name is already declared.
    pub fn declare(
        &mut self,
        name: OperationName,
        projection: Projection,
        family: OperationFamily,
        description: &'static str,
    ) -> Result<(), RegistryError> {
        if self.operations.iter().any(|op| op.name == name) {
            return Err(RegistryError::DuplicateOperation { operation: name });
        }

        debug!(operation = %name, %projection, %family, "Declared operation");
        self.operations.push(Operation {
            name,
            projection,
            family,
            description,
            entries: Vec::new(),
            registered: BTreeSet::new(),
        });
        Ok(())
    }

    /// Register one library entry under a declared operation.
    ///
    /// Fails if the operation is unknown or the library already registered for
    /// it, whether or not that library is enabled. Entries of disabled libraries
    /// are dropped after the check.
    pub fn register<C>(&mut self, operation: &str, entry: C) -> Result<(), RegistryError>
    where
        C: Candidate + 'static,
    {
        let enabled = self
            .enabled
            .as_ref()
            .map_or(true, |set| set.contains(&entry.library()));

        let op = self.resolve_mut(operation)?;
        let library = entry.library();

        if !op.registered.insert(library) {
            return Err(RegistryError::DuplicateEntry {
                operation: op.name.clone(),
                library,
            });
        }

        if !enabled {
            trace!(operation = %op.name, %library, "Skipping disabled library");
            return Ok(());
        }

        debug!(
            operation = %op.name,
            %library,
            input = %entry.describe_input(),
            "Registered library entry"
        );
        op.entries.push(Box::new(entry));
        Ok(())
    }

    /// Every operation with its entries, in declaration order.
    pub fn operations(&self) -> impl Iterator<Item = &Operation> + Clone {
        self.operations.iter()
    }

    /// Look up an operation by name.
    pub fn resolve(&self, operation: &str) -> Result<&Operation, RegistryError> {
        self.operations
            .iter()
            .find(|op| op.name.as_str() == operation)
            .ok_or_else(|| RegistryError::OperationNotFound {
                operation: operation.to_string(),
            })
    }

    /// Look up one library's entry for an operation.
    pub fn resolve_entry(
        &self,
        operation: &str,
        library: Library,
    ) -> Result<&dyn Candidate, RegistryError> {
        let op = self.resolve(operation)?;
        op.entry(library)
            .ok_or_else(|| RegistryError::LibraryNotRegistered {
                operation: op.name.clone(),
                library,
            })
    }

    /// Every (operation, entry) pair: one parametrized case each.
    pub fn cases(&self) -> impl Iterator<Item = (&Operation, &dyn Candidate)> + Clone {
        self.operations
            .iter()
            .flat_map(|op| op.entries().map(move |entry| (op, entry)))
    }

    /// Number of declared operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    fn resolve_mut(&mut self, operation: &str) -> Result<&mut Operation, RegistryError> {
        self.operations
            .iter_mut()
            .find(|op| op.name.as_str() == operation)
            .ok_or_else(|| RegistryError::OperationNotFound {
                operation: operation.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn registry_with(name: &str) -> OperationRegistry {
        let mut registry = OperationRegistry::new();
        registry
            .declare(
                OperationName::new(name).unwrap(),
                Projection::DayOfMonth,
                OperationFamily::Parse,
                "test operation",
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = registry_with("day_of");
        registry
            .register("day_of", LibraryEntry::new(Library::Chrono, 19u8, |d: &u8| *d))
            .unwrap();
        registry
            .register("day_of", LibraryEntry::new(Library::Jiff, 19i8, |d: &i8| *d))
            .unwrap();

        let op = registry.resolve("day_of").unwrap();
        assert_eq!(op.len(), 2);
        assert_eq!(
            op.libraries().collect::<Vec<_>>(),
            vec![Library::Chrono, Library::Jiff]
        );

        let entry = registry.resolve_entry("day_of", Library::Jiff).unwrap();
        assert_eq!(
            entry.observe(Projection::DayOfMonth),
            Ok(Projected::Integer(19))
        );
    }

    #[test]
    fn test_duplicate_entry_rejected() {
        let mut registry = registry_with("day_of");
        registry
            .register("day_of", LibraryEntry::new(Library::Time, 1u8, |d: &u8| *d))
            .unwrap();

        let err = registry
            .register("day_of", LibraryEntry::new(Library::Time, 2u8, |d: &u8| *d))
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::DuplicateEntry {
                library: Library::Time,
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_operation_rejected() {
        let mut registry = registry_with("day_of");
        let err = registry
            .declare(
                OperationName::new("day_of").unwrap(),
                Projection::HourOfDay,
                OperationFamily::Now,
                "again",
            )
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateOperation { .. }));
    }

    #[test]
    fn test_unknown_operation() {
        let mut registry = registry_with("day_of");
        assert!(matches!(
            registry.resolve("hour_of"),
            Err(RegistryError::OperationNotFound { .. })
        ));
        assert!(matches!(
            registry.register("hour_of", LibraryEntry::new(Library::Std, 1u8, |d: &u8| *d)),
            Err(RegistryError::OperationNotFound { .. })
        ));
        assert!(matches!(
            registry.resolve_entry("day_of", Library::Std),
            Err(RegistryError::LibraryNotRegistered { .. })
        ));
    }

    #[test]
    fn test_disabled_library_skipped() {
        let mut registry = OperationRegistry::with_libraries([Library::Chrono]);
        registry
            .declare(
                OperationName::new("day_of").unwrap(),
                Projection::DayOfMonth,
                OperationFamily::Parse,
                "test operation",
            )
            .unwrap();
        registry
            .register("day_of", LibraryEntry::new(Library::Chrono, 1u8, |d: &u8| *d))
            .unwrap();
        registry
            .register("day_of", LibraryEntry::new(Library::Jiff, 1i8, |d: &i8| *d))
            .unwrap();

        assert_eq!(registry.resolve("day_of").unwrap().len(), 1);
        assert_eq!(registry.cases().count(), 1);
    }

    #[test]
    fn test_duplicate_disabled_library_rejected() {
        let mut registry = OperationRegistry::with_libraries([Library::Jiff]);
        registry
            .declare(
                OperationName::new("clock").unwrap(),
                Projection::HourOfDay,
                OperationFamily::Now,
                "test operation",
            )
            .unwrap();

        registry
            .register("clock", nullary(Library::Std, std::time::SystemTime::now))
            .unwrap();
        let err = registry
            .register("clock", nullary(Library::Std, std::time::SystemTime::now))
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::DuplicateEntry {
                library: Library::Std,
                ..
            }
        ));
        assert!(registry.resolve("clock").unwrap().is_empty());
    }

    #[test]
    fn test_batch_invokes_every_input() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let entry = LibraryEntry::new(Library::Chrono, 0u8, move |d: &u8| {
            counter.fetch_add(1, Ordering::Relaxed);
            *d
        })
        .with_batch([1u8, 2, 3]);

        entry.invoke();
        assert_eq!(calls.load(Ordering::Relaxed), 3);

        // The probe input is used for observation, not the batch.
        assert_eq!(
            entry.observe(Projection::DayOfMonth),
            Ok(Projected::Integer(0))
        );
        assert_eq!(
            entry.observe_batch(Projection::DayOfMonth),
            Ok(vec![
                Projected::Integer(1),
                Projected::Integer(2),
                Projected::Integer(3)
            ])
        );
    }

    #[test]
    fn test_observe_batch_reports_failing_input() {
        let entry = LibraryEntry::new(Library::Jiff, "2024-06-30T09:46:00Z", |s: &&str| {
            s.parse::<jiff::Timestamp>()
        })
        .with_batch(["2024-06-30T09:46:00Z", "not a timestamp"]);

        assert!(entry.observe(Projection::DayOfMonth).is_ok());
        assert!(matches!(
            entry.observe_batch(Projection::DayOfMonth),
            Err(ObserveFailure::Failed(_))
        ));

        let single = nullary(Library::Std, || 5u8);
        assert_eq!(single.observe_batch(Projection::DayOfMonth), Ok(Vec::new()));
    }

    #[test]
    fn test_cases_are_restartable() {
        let mut registry = registry_with("day_of");
        registry
            .register("day_of", nullary(Library::Std, || 5u8))
            .unwrap();

        let cases = registry.cases();
        assert_eq!(cases.clone().count(), 1);
        assert_eq!(cases.count(), 1);
        assert_eq!(registry.operations().count(), 1);
    }
}
