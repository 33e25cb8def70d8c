//! Built-in methods: option translation between the key/value bag and
//! the typed codec options.

use crunch_core::{CompressError, Decode, Encode, Limits};
use crunch_deflate::{
    DeflateDecoder, DeflateEncoder, DeflateOptions, DeflateStrategy
};
use crunch_gzip::{GzipDecoder, GzipEncoder, GzipOptions};

use crate::options::{OptionBag, OptionSchema, SchemaEntry, UnknownKeyPolicy};
use crate::registry::Method;

static STRATEGY_NAMES: &[&str] =
    &["default", "filtered", "huffman_only", "rle", "fixed"];

fn limits_entries(schema: OptionSchema) -> OptionSchema
{
    schema
        .with_entry(SchemaEntry::uint64("limits.max_output_bytes", 0, u64::MAX))
        .with_entry(SchemaEntry::uint64("limits.max_memory_bytes", 0, u64::MAX))
        .with_entry(SchemaEntry::uint64("limits.max_window_bytes", 0, u64::MAX))
        .with_entry(SchemaEntry::uint64(
            "limits.max_expansion_ratio",
            0,
            u64::MAX
        ))
}

fn deflate_entries(schema: OptionSchema) -> OptionSchema
{
    schema
        .with_entry(SchemaEntry::int64("deflate.level", 0, 9))
        .with_entry(SchemaEntry::uint64("deflate.window_bits", 8, 15))
        .with_entry(SchemaEntry::string_enum(
            "deflate.strategy",
            STRATEGY_NAMES
        ))
}

fn limits_from_bag(bag: &OptionBag) -> Limits
{
    let mut limits = Limits::default();

    if let Some(v) = bag.get_uint64("limits.max_output_bytes")
    {
        limits = limits.set_max_output_bytes(v);
    }
    if let Some(v) = bag.get_uint64("limits.max_memory_bytes")
    {
        limits = limits.set_max_memory_bytes(v);
    }
    if let Some(v) = bag.get_uint64("limits.max_window_bytes")
    {
        limits = limits.set_max_window_bytes(v);
    }
    if let Some(v) = bag.get_uint64("limits.max_expansion_ratio")
    {
        limits = limits.set_max_expansion_ratio(v);
    }

    limits
}

fn deflate_options_from_bag(
    bag: &OptionBag
) -> Result<DeflateOptions, CompressError>
{
    let mut options =
        DeflateOptions::default().set_limits(limits_from_bag(bag));

    if let Some(level) = bag.get_int64("deflate.level")
    {
        options = options.set_level(level);
    }

    if let Some(bits) = bag.get_uint64("deflate.window_bits")
    {
        options = options.set_window_bits(bits.min(u64::from(u32::MAX)) as u32);
    }

    if let Some(name) = bag.get_str("deflate.strategy")
    {
        let strategy = DeflateStrategy::from_name(name).ok_or_else(|| {
            CompressError::invalid_arg(format!(
                "unknown deflate.strategy {name:?}"
            ))
        })?;
        options = options.set_strategy(strategy);
    }

    Ok(options)
}

fn gzip_options_from_bag(
    bag: &OptionBag
) -> Result<GzipOptions, CompressError>
{
    let mut options =
        GzipOptions::default().set_deflate(deflate_options_from_bag(bag)?);

    if let Some(v) = bag.get_uint64("gzip.mtime")
    {
        options = options.set_mtime(v as u32);
    }
    if let Some(v) = bag.get_uint64("gzip.os")
    {
        options = options.set_os(v as u8);
    }
    if let Some(v) = bag.get_uint64("gzip.xfl")
    {
        options = options.set_xfl(v as u8);
    }
    if let Some(v) = bag.get_str("gzip.name")
    {
        options = options.set_name(v);
    }
    if let Some(v) = bag.get_str("gzip.comment")
    {
        options = options.set_comment(v);
    }
    if let Some(v) = bag.get_bytes("gzip.extra")
    {
        options = options.set_extra(v.to_vec());
    }
    if let Some(v) = bag.get_bool("gzip.header_crc")
    {
        options = options.set_header_crc(v);
    }
    if let Some(v) = bag.get_bool("gzip.concat")
    {
        options = options.set_concat(v);
    }
    if let Some(v) = bag.get_uint64("gzip.max_name_bytes")
    {
        options = options.set_max_name_bytes(v);
    }
    if let Some(v) = bag.get_uint64("gzip.max_comment_bytes")
    {
        options = options.set_max_comment_bytes(v);
    }
    if let Some(v) = bag.get_uint64("gzip.max_extra_bytes")
    {
        options = options.set_max_extra_bytes(v);
    }

    Ok(options)
}

/// The raw DEFLATE (RFC 1951) method.
pub struct DeflateMethod
{
    schema: OptionSchema
}

impl DeflateMethod
{
    pub fn new() -> DeflateMethod
    {
        let schema =
            limits_entries(deflate_entries(OptionSchema::new(
                UnknownKeyPolicy::Error
            )));

        DeflateMethod { schema }
    }
}

impl Default for DeflateMethod
{
    fn default() -> Self
    {
        DeflateMethod::new()
    }
}

impl Method for DeflateMethod
{
    fn name(&self) -> &'static str
    {
        "deflate"
    }

    fn schema(&self) -> &OptionSchema
    {
        &self.schema
    }

    fn create_encoder(
        &self, options: &OptionBag
    ) -> Result<Box<dyn Encode>, CompressError>
    {
        let options = deflate_options_from_bag(options)?;

        Ok(Box::new(DeflateEncoder::new_with_options(options)?))
    }

    fn create_decoder(
        &self, options: &OptionBag
    ) -> Result<Box<dyn Decode>, CompressError>
    {
        let options = deflate_options_from_bag(options)?;

        Ok(Box::new(DeflateDecoder::new_with_options(options)?))
    }
}

/// The gzip (RFC 1952) method. Understands the `deflate.*` keys too
/// and forwards them to the inner codec.
pub struct GzipMethod
{
    schema: OptionSchema
}

impl GzipMethod
{
    pub fn new() -> GzipMethod
    {
        let schema =
            limits_entries(deflate_entries(OptionSchema::new(
                UnknownKeyPolicy::Error
            )))
            .with_entry(SchemaEntry::uint64("gzip.mtime", 0, u64::from(u32::MAX)))
            .with_entry(SchemaEntry::uint64("gzip.os", 0, 255))
            .with_entry(SchemaEntry::uint64("gzip.xfl", 0, 255))
            .with_entry(SchemaEntry::string("gzip.name"))
            .with_entry(SchemaEntry::string("gzip.comment"))
            .with_entry(SchemaEntry::bytes("gzip.extra"))
            .with_entry(SchemaEntry::boolean("gzip.header_crc"))
            .with_entry(SchemaEntry::boolean("gzip.concat"))
            .with_entry(SchemaEntry::uint64("gzip.max_name_bytes", 0, u64::MAX))
            .with_entry(SchemaEntry::uint64(
                "gzip.max_comment_bytes",
                0,
                u64::MAX
            ))
            .with_entry(SchemaEntry::uint64("gzip.max_extra_bytes", 0, u64::MAX));

        GzipMethod { schema }
    }
}

impl Default for GzipMethod
{
    fn default() -> Self
    {
        GzipMethod::new()
    }
}

impl Method for GzipMethod
{
    fn name(&self) -> &'static str
    {
        "gzip"
    }

    fn schema(&self) -> &OptionSchema
    {
        &self.schema
    }

    fn create_encoder(
        &self, options: &OptionBag
    ) -> Result<Box<dyn Encode>, CompressError>
    {
        let options = gzip_options_from_bag(options)?;

        Ok(Box::new(GzipEncoder::new_with_options(options)?))
    }

    fn create_decoder(
        &self, options: &OptionBag
    ) -> Result<Box<dyn Decode>, CompressError>
    {
        let options = gzip_options_from_bag(options)?;

        Ok(Box::new(GzipDecoder::new_with_options(options)?))
    }
}
