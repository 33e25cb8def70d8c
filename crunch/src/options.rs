//! Key/value option store and per-method schemas
//!
//! Options travel as a string-keyed bag of typed values
//! (`deflate.level`, `gzip.name`, `limits.max_output_bytes`, ...).
//! Each registered method publishes a schema describing the keys it
//! understands; the registry validates a bag against the schema before
//! any codec sees it.

use std::collections::BTreeMap;

use crunch_core::CompressError;
use log::trace;

/// Type tag of an option value.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum OptionType
{
    Int64,
    UInt64,
    Bool,
    Str,
    Bytes
}

/// A single typed option value.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue
{
    Int64(i64),
    UInt64(u64),
    Bool(bool),
    Str(String),
    Bytes(Vec<u8>)
}

impl OptionValue
{
    pub const fn type_of(&self) -> OptionType
    {
        match self
        {
            OptionValue::Int64(_) => OptionType::Int64,
            OptionValue::UInt64(_) => OptionType::UInt64,
            OptionValue::Bool(_) => OptionType::Bool,
            OptionValue::Str(_) => OptionType::Str,
            OptionValue::Bytes(_) => OptionType::Bytes
        }
    }
}

/// String-keyed store of typed option values.
///
/// A frozen bag rejects further mutation; freeze before sharing a bag
/// across threads or codecs.
#[derive(Debug, Clone, Default)]
pub struct OptionBag
{
    entries: BTreeMap<String, OptionValue>,
    frozen:  bool
}

impl OptionBag
{
    pub fn new() -> OptionBag
    {
        OptionBag::default()
    }

    fn set(
        &mut self, key: &str, value: OptionValue
    ) -> Result<(), CompressError>
    {
        if self.frozen
        {
            return Err(CompressError::invalid_arg(format!(
                "cannot set {key:?} on a frozen option bag"
            )));
        }

        self.entries.insert(key.to_owned(), value);
        Ok(())
    }

    pub fn set_int64(
        &mut self, key: &str, value: i64
    ) -> Result<(), CompressError>
    {
        self.set(key, OptionValue::Int64(value))
    }

    pub fn set_uint64(
        &mut self, key: &str, value: u64
    ) -> Result<(), CompressError>
    {
        self.set(key, OptionValue::UInt64(value))
    }

    pub fn set_bool(
        &mut self, key: &str, value: bool
    ) -> Result<(), CompressError>
    {
        self.set(key, OptionValue::Bool(value))
    }

    pub fn set_str(
        &mut self, key: &str, value: &str
    ) -> Result<(), CompressError>
    {
        self.set(key, OptionValue::Str(value.to_owned()))
    }

    pub fn set_bytes(
        &mut self, key: &str, value: &[u8]
    ) -> Result<(), CompressError>
    {
        self.set(key, OptionValue::Bytes(value.to_vec()))
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue>
    {
        self.entries.get(key)
    }

    pub fn get_int64(&self, key: &str) -> Option<i64>
    {
        match self.entries.get(key)
        {
            Some(OptionValue::Int64(v)) => Some(*v),
            _ => None
        }
    }

    pub fn get_uint64(&self, key: &str) -> Option<u64>
    {
        match self.entries.get(key)
        {
            Some(OptionValue::UInt64(v)) => Some(*v),
            _ => None
        }
    }

    pub fn get_bool(&self, key: &str) -> Option<bool>
    {
        match self.entries.get(key)
        {
            Some(OptionValue::Bool(v)) => Some(*v),
            _ => None
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str>
    {
        match self.entries.get(key)
        {
            Some(OptionValue::Str(v)) => Some(v.as_str()),
            _ => None
        }
    }

    pub fn get_bytes(&self, key: &str) -> Option<&[u8]>
    {
        match self.entries.get(key)
        {
            Some(OptionValue::Bytes(v)) => Some(v.as_slice()),
            _ => None
        }
    }

    /// Make the bag immutable. There is no thaw.
    pub fn freeze(&mut self)
    {
        self.frozen = true;
    }

    pub const fn is_frozen(&self) -> bool
    {
        self.frozen
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)>
    {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize
    {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.entries.is_empty()
    }
}

/// What a schema does with keys it does not know.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UnknownKeyPolicy
{
    /// Reject the bag with `InvalidArg`.
    Error,
    /// Skip the key (logged at trace level).
    Ignore
}

/// One recognized option key with its type and constraints.
#[derive(Debug, Clone)]
pub struct SchemaEntry
{
    key:            &'static str,
    ty:             OptionType,
    int_range:      Option<(i64, i64)>,
    uint_range:     Option<(u64, u64)>,
    allowed_values: Option<&'static [&'static str]>
}

impl SchemaEntry
{
    pub fn int64(key: &'static str, min: i64, max: i64) -> SchemaEntry
    {
        SchemaEntry {
            key,
            ty: OptionType::Int64,
            int_range: Some((min, max)),
            uint_range: None,
            allowed_values: None
        }
    }

    pub fn uint64(key: &'static str, min: u64, max: u64) -> SchemaEntry
    {
        SchemaEntry {
            key,
            ty: OptionType::UInt64,
            int_range: None,
            uint_range: Some((min, max)),
            allowed_values: None
        }
    }

    pub fn boolean(key: &'static str) -> SchemaEntry
    {
        SchemaEntry {
            key,
            ty: OptionType::Bool,
            int_range: None,
            uint_range: None,
            allowed_values: None
        }
    }

    pub fn string(key: &'static str) -> SchemaEntry
    {
        SchemaEntry {
            key,
            ty: OptionType::Str,
            int_range: None,
            uint_range: None,
            allowed_values: None
        }
    }

    pub fn string_enum(
        key: &'static str, values: &'static [&'static str]
    ) -> SchemaEntry
    {
        SchemaEntry {
            key,
            ty: OptionType::Str,
            int_range: None,
            uint_range: None,
            allowed_values: Some(values)
        }
    }

    pub fn bytes(key: &'static str) -> SchemaEntry
    {
        SchemaEntry {
            key,
            ty: OptionType::Bytes,
            int_range: None,
            uint_range: None,
            allowed_values: None
        }
    }

    pub const fn key(&self) -> &'static str
    {
        self.key
    }

    pub const fn option_type(&self) -> OptionType
    {
        self.ty
    }

    fn check(&self, value: &OptionValue) -> Result<(), CompressError>
    {
        if value.type_of() != self.ty
        {
            return Err(CompressError::invalid_arg(format!(
                "option {:?} expects {:?}, got {:?}",
                self.key,
                self.ty,
                value.type_of()
            )));
        }

        match value
        {
            OptionValue::Int64(v) =>
            {
                if let Some((min, max)) = self.int_range
                {
                    if *v < min || *v > max
                    {
                        return Err(CompressError::invalid_arg(format!(
                            "option {:?} value {v} outside [{min}, {max}]",
                            self.key
                        )));
                    }
                }
            }
            OptionValue::UInt64(v) =>
            {
                if let Some((min, max)) = self.uint_range
                {
                    if *v < min || *v > max
                    {
                        return Err(CompressError::invalid_arg(format!(
                            "option {:?} value {v} outside [{min}, {max}]",
                            self.key
                        )));
                    }
                }
            }
            OptionValue::Str(v) =>
            {
                if let Some(allowed) = self.allowed_values
                {
                    if !allowed.contains(&v.as_str())
                    {
                        return Err(CompressError::invalid_arg(format!(
                            "option {:?} value {v:?} not one of {allowed:?}",
                            self.key
                        )));
                    }
                }
            }
            _ =>
            {}
        }

        Ok(())
    }
}

/// The option keys a method understands.
#[derive(Debug, Clone)]
pub struct OptionSchema
{
    entries:      Vec<SchemaEntry>,
    unknown_keys: UnknownKeyPolicy
}

impl OptionSchema
{
    pub fn new(unknown_keys: UnknownKeyPolicy) -> OptionSchema
    {
        OptionSchema {
            entries: Vec::new(),
            unknown_keys
        }
    }

    pub fn with_entry(mut self, entry: SchemaEntry) -> Self
    {
        debug_assert!(self.entries.iter().all(|e| e.key != entry.key));

        self.entries.push(entry);
        self
    }

    pub fn entries(&self) -> &[SchemaEntry]
    {
        &self.entries
    }

    pub const fn unknown_key_policy(&self) -> UnknownKeyPolicy
    {
        self.unknown_keys
    }

    /// Check every bag entry against the schema.
    pub fn validate(&self, bag: &OptionBag) -> Result<(), CompressError>
    {
        for (key, value) in bag.iter()
        {
            match self.entries.iter().find(|e| e.key == key)
            {
                Some(entry) => entry.check(value)?,
                None => match self.unknown_keys
                {
                    UnknownKeyPolicy::Error =>
                    {
                        return Err(CompressError::invalid_arg(format!(
                            "unknown option key {key:?}"
                        )));
                    }
                    UnknownKeyPolicy::Ignore =>
                    {
                        trace!("ignoring unknown option key {key:?}");
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests
{
    use crunch_core::ErrorKind;

    use super::*;

    #[test]
    fn frozen_bags_reject_mutation()
    {
        let mut bag = OptionBag::new();

        bag.set_int64("deflate.level", 9).unwrap();
        bag.freeze();

        assert_eq!(
            bag.set_int64("deflate.level", 1).unwrap_err().kind(),
            ErrorKind::InvalidArg
        );
        assert_eq!(bag.get_int64("deflate.level"), Some(9));
    }

    #[test]
    fn typed_getters_do_not_coerce()
    {
        let mut bag = OptionBag::new();

        bag.set_uint64("limits.max_output_bytes", 7).unwrap();

        assert_eq!(bag.get_int64("limits.max_output_bytes"), None);
        assert_eq!(bag.get_uint64("limits.max_output_bytes"), Some(7));
    }

    #[test]
    fn schema_checks_types_ranges_and_enums()
    {
        let schema = OptionSchema::new(UnknownKeyPolicy::Error)
            .with_entry(SchemaEntry::int64("deflate.level", 0, 9))
            .with_entry(SchemaEntry::string_enum(
                "deflate.strategy",
                &["default", "rle"]
            ));

        let mut bag = OptionBag::new();
        bag.set_int64("deflate.level", 12).unwrap();
        assert_eq!(
            schema.validate(&bag).unwrap_err().kind(),
            ErrorKind::InvalidArg
        );

        let mut bag = OptionBag::new();
        bag.set_str("deflate.strategy", "fastest").unwrap();
        assert_eq!(
            schema.validate(&bag).unwrap_err().kind(),
            ErrorKind::InvalidArg
        );

        let mut bag = OptionBag::new();
        bag.set_uint64("nope", 1).unwrap();
        assert_eq!(
            schema.validate(&bag).unwrap_err().kind(),
            ErrorKind::InvalidArg
        );

        let mut bag = OptionBag::new();
        bag.set_int64("deflate.level", 3).unwrap();
        bag.set_str("deflate.strategy", "rle").unwrap();
        assert!(schema.validate(&bag).is_ok());
    }

    #[test]
    fn ignore_policy_skips_unknown_keys()
    {
        let schema = OptionSchema::new(UnknownKeyPolicy::Ignore);

        let mut bag = OptionBag::new();
        bag.set_bool("anything.goes", true).unwrap();
        assert!(schema.validate(&bag).is_ok());
    }
}
