//! Method registry
//!
//! Compression methods register under a name ("deflate", "gzip") and
//! expose an option schema plus codec constructors. The registry is
//! read-only after registration, so shared lookups need no locking;
//! registration itself requires exclusive access.
//!
//! There is deliberately no process-wide default registry: callers
//! construct one (usually via [`Registry::with_default_methods`]) and
//! own it.

use std::collections::BTreeMap;

use crunch_core::{CompressError, Decode, Encode};

use crate::methods::{DeflateMethod, GzipMethod};
use crate::options::{OptionBag, OptionSchema};

/// A registered compression method.
pub trait Method: Send + Sync
{
    /// Registry key, e.g. `"gzip"`.
    fn name(&self) -> &'static str;

    /// The option keys this method understands.
    fn schema(&self) -> &OptionSchema;

    fn create_encoder(
        &self, options: &OptionBag
    ) -> Result<Box<dyn Encode>, CompressError>;

    fn create_decoder(
        &self, options: &OptionBag
    ) -> Result<Box<dyn Decode>, CompressError>;
}

pub struct Registry
{
    methods: BTreeMap<&'static str, Box<dyn Method>>
}

impl Registry
{
    /// An empty registry.
    pub fn new() -> Registry
    {
        Registry {
            methods: BTreeMap::new()
        }
    }

    /// A registry with the built-in methods registered: `deflate` and
    /// `gzip`.
    pub fn with_default_methods() -> Registry
    {
        let mut registry = Registry::new();

        registry
            .register(Box::new(DeflateMethod::new()))
            .expect("empty registry accepts deflate");
        registry
            .register(Box::new(GzipMethod::new()))
            .expect("empty registry accepts gzip");

        registry
    }

    /// Register a method. Duplicate names are rejected.
    pub fn register(
        &mut self, method: Box<dyn Method>
    ) -> Result<(), CompressError>
    {
        let name = method.name();

        if self.methods.contains_key(name)
        {
            return Err(CompressError::invalid_arg(format!(
                "method {name:?} is already registered"
            )));
        }

        self.methods.insert(name, method);
        Ok(())
    }

    pub fn find(&self, name: &str) -> Option<&dyn Method>
    {
        self.methods.get(name).map(|method| &**method)
    }

    /// Registered method names, sorted.
    pub fn method_names(&self) -> impl Iterator<Item = &'static str> + '_
    {
        self.methods.keys().copied()
    }
}

impl Default for Registry
{
    fn default() -> Self
    {
        Registry::with_default_methods()
    }
}
