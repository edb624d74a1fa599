//! Named content processors and their registry.
//!
//! A processor is a pure `&str -> String` transformation referenced by name
//! from asset and bundle chains. The registry is read lock-free through
//! `arc-swap`; writers serialize on a mutex and publish a whole new map, so a
//! reader never observes a half-applied replacement.

pub mod minify;

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::debug;
use crate::error::{Error, Result};

type ProcessFn = dyn Fn(&str) -> anyhow::Result<String> + Send + Sync;

/// What to do when a name is already registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnConflict {
    /// Fail with a duplicate-registration error.
    #[default]
    Reject,
    /// Last writer wins.
    Replace,
}

impl OnConflict {
    pub fn from_replace(replace: bool) -> Self {
        if replace { Self::Replace } else { Self::Reject }
    }
}

/// A named content transformation.
#[derive(Clone)]
pub struct Processor {
    name: Arc<str>,
    func: Arc<ProcessFn>,
}

impl Processor {
    pub fn new<F>(name: impl Into<Arc<str>>, func: F) -> Self
    where
        F: Fn(&str) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// Build a processor named after the function item itself.
    ///
    /// `fn cssmin(..)` becomes `"cssmin"`. Closures have no usable name and
    /// are rejected with [`Error::UnnamedProcessor`].
    pub fn from_fn<F>(func: F) -> Result<Self>
    where
        F: Fn(&str) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        let name = derive_name::<F>()?;
        Ok(Self::new(name, func))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the processor, tagging failures with its name.
    pub fn apply(&self, content: &str) -> Result<String> {
        (self.func)(content).map_err(|source| Error::Processor {
            name: self.name.to_string(),
            source,
        })
    }

    /// Whether two handles point at the same function value.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Processor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Processor").field(&self.name).finish()
    }
}

fn derive_name<F>() -> Result<String> {
    let full = std::any::type_name::<F>();
    let last = full.rsplit("::").next().unwrap_or(full);
    let valid = !last.is_empty() && last.chars().all(|c| c.is_alphanumeric() || c == '_');
    if valid {
        Ok(last.to_string())
    } else {
        Err(Error::UnnamedProcessor(full.to_string()))
    }
}

/// Immutable view of the registered processors.
#[derive(Debug, Clone, Default)]
pub struct Processors(FxHashMap<String, Processor>);

impl Processors {
    pub fn get(&self, name: &str) -> Result<&Processor> {
        self.0
            .get(name)
            .ok_or_else(|| Error::ProcessorNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Apply `chain` left to right, feeding each output into the next processor.
    pub fn apply_chain<S: AsRef<str>>(&self, chain: &[S], content: String) -> Result<String> {
        chain.iter().try_fold(content, |acc, name| {
            self.get(name.as_ref())?.apply(&acc)
        })
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.0.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Process-wide mapping from processor name to function.
pub struct ProcessorRegistry {
    map: ArcSwap<Processors>,
    write: Mutex<()>,
}

impl ProcessorRegistry {
    /// Registry pre-populated with the built-in processors.
    pub fn new() -> Self {
        let map = builtins()
            .into_iter()
            .map(|processor| (processor.name().to_string(), processor))
            .collect();
        Self::with_processors(Processors(map))
    }

    pub fn empty() -> Self {
        Self::with_processors(Processors::default())
    }

    fn with_processors(processors: Processors) -> Self {
        Self {
            map: ArcSwap::from_pointee(processors),
            write: Mutex::new(()),
        }
    }

    /// Register a function, naming it after itself unless `name` is given.
    pub fn register<F>(&self, func: F, name: Option<&str>, on_conflict: OnConflict) -> Result<()>
    where
        F: Fn(&str) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        let processor = match name {
            Some(name) => Processor::new(name, func),
            None => Processor::from_fn(func)?,
        };
        self.insert(processor, on_conflict)
    }

    pub fn insert(&self, processor: Processor, on_conflict: OnConflict) -> Result<()> {
        let _guard = self.write.lock();
        let current = self.map.load();
        if on_conflict == OnConflict::Reject && current.contains(processor.name()) {
            return Err(Error::DuplicateProcessor(processor.name().to_string()));
        }

        debug!("processor"; "register `{}` ({:?})", processor.name(), on_conflict);
        let mut next = Processors::clone(&current);
        next.0.insert(processor.name().to_string(), processor);
        self.map.store(Arc::new(next));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Processor> {
        self.map.load().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.load().contains(name)
    }

    /// Consistent view for the duration of one operation.
    pub fn snapshot(&self) -> Arc<Processors> {
        self.map.load_full()
    }
}

impl Default for ProcessorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Processors registered on every new registry.
pub fn builtins() -> Vec<Processor> {
    vec![
        Processor::new("cssmin", minify::cssmin),
        Processor::new("jsmin", minify::jsmin),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_processor(content: &str) -> anyhow::Result<String> {
        Ok(format!("FOOBAR{content}"))
    }

    fn suffix(content: &str) -> anyhow::Result<String> {
        Ok(format!("{content}BARFOO"))
    }

    #[test]
    fn test_default_processors() {
        let registry = ProcessorRegistry::new();
        for processor in builtins() {
            assert!(registry.get(processor.name()).is_ok());
        }
        assert!(registry.contains("cssmin"));
        assert!(registry.contains("jsmin"));
        assert_eq!(registry.snapshot().names(), ["cssmin", "jsmin"]);
        assert!(ProcessorRegistry::empty().snapshot().names().is_empty());

        // Built-ins are ordinary entries: rejected on conflict, replaceable.
        let err = registry.insert(Processor::new("cssmin", |c: &str| Ok(c.to_string())), OnConflict::Reject);
        assert!(matches!(err, Err(Error::DuplicateProcessor(_))));
    }

    #[test]
    fn test_register_processor() {
        let registry = ProcessorRegistry::new();
        registry.register(test_processor, None, OnConflict::Reject).unwrap();
        registry.get("test_processor").unwrap();

        let err = registry
            .register(test_processor, None, OnConflict::Reject)
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateProcessor(name) if name == "test_processor"));

        registry.register(test_processor, None, OnConflict::Replace).unwrap();
        registry.get("test_processor").unwrap();
    }

    #[test]
    fn test_register_named_processor() {
        let registry = ProcessorRegistry::new();
        registry.register(test_processor, None, OnConflict::Reject).unwrap();
        registry.register(test_processor, Some("test1"), OnConflict::Reject).unwrap();
        registry.register(test_processor, Some("test2"), OnConflict::Reject).unwrap();
        assert!(
            registry
                .register(test_processor, Some("test1"), OnConflict::Reject)
                .is_err()
        );
        registry.register(test_processor, Some("test1"), OnConflict::Replace).unwrap();

        registry.get("test_processor").unwrap();
        registry.get("test1").unwrap();
        registry.get("test2").unwrap();
    }

    #[test]
    fn test_replace_returns_new_entry() {
        let registry = ProcessorRegistry::empty();
        registry.register(test_processor, Some("p"), OnConflict::Reject).unwrap();
        let old = registry.get("p").unwrap();
        registry.register(suffix, Some("p"), OnConflict::Replace).unwrap();
        let new = registry.get("p").unwrap();

        assert!(!old.ptr_eq(&new));
        assert_eq!(new.apply("x").unwrap(), "xBARFOO");
    }

    #[test]
    fn test_get_processor_returns_registered_function() {
        let registry = ProcessorRegistry::empty();
        let processor = Processor::new("test1", test_processor);
        registry.insert(processor.clone(), OnConflict::Reject).unwrap();
        assert!(registry.get("test1").unwrap().ptr_eq(&processor));
    }

    #[test]
    fn test_processor_not_found() {
        let registry = ProcessorRegistry::new();
        let err = registry.get("test_processor").unwrap_err();
        assert!(matches!(err, Error::ProcessorNotFound(_)));

        registry.register(test_processor, None, OnConflict::Reject).unwrap();
        registry.get("test_processor").unwrap();
    }

    #[test]
    fn test_apply_processor() {
        let registry = ProcessorRegistry::new();
        registry.register(test_processor, Some("test"), OnConflict::Reject).unwrap();
        let processor = registry.get("test").unwrap();
        assert_eq!(processor.apply("some garbage").unwrap(), "FOOBARsome garbage");
        // Deterministic
        assert_eq!(processor.apply("some garbage").unwrap(), "FOOBARsome garbage");
    }

    #[test]
    fn test_closure_needs_explicit_name() {
        let registry = ProcessorRegistry::empty();
        let err = registry
            .register(|c: &str| Ok(c.to_uppercase()), None, OnConflict::Reject)
            .unwrap_err();
        assert!(matches!(err, Error::UnnamedProcessor(_)));

        registry
            .register(|c: &str| Ok(c.to_uppercase()), Some("upper"), OnConflict::Reject)
            .unwrap();
        assert_eq!(registry.get("upper").unwrap().apply("abc").unwrap(), "ABC");
    }

    #[test]
    fn test_apply_chain_order() {
        let registry = ProcessorRegistry::empty();
        registry.register(test_processor, None, OnConflict::Reject).unwrap();
        registry.register(suffix, None, OnConflict::Reject).unwrap();
        let processors = registry.snapshot();

        let out = processors
            .apply_chain(&["test_processor", "suffix"], "x".into())
            .unwrap();
        assert_eq!(out, "FOOBARxBARFOO");

        let out = processors.apply_chain::<&str>(&[], "x".into()).unwrap();
        assert_eq!(out, "x");

        let err = processors
            .apply_chain(&["missing"], "x".into())
            .unwrap_err();
        assert!(matches!(err, Error::ProcessorNotFound(name) if name == "missing"));
    }

    #[test]
    fn test_processor_failure_carries_name() {
        let registry = ProcessorRegistry::empty();
        registry
            .register(|_: &str| anyhow::bail!("boom"), Some("broken"), OnConflict::Reject)
            .unwrap();
        let err = registry.get("broken").unwrap().apply("x").unwrap_err();
        assert!(matches!(err, Error::Processor { name, .. } if name == "broken"));
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_writes() {
        let registry = ProcessorRegistry::empty();
        let before = registry.snapshot();
        registry.register(test_processor, None, OnConflict::Reject).unwrap();
        assert!(!before.contains("test_processor"));
        assert!(registry.snapshot().contains("test_processor"));
    }
}
