//! Resource limits respected by every codec
//!
//! A value of zero means "unlimited" for every field, mirroring the
//! option keys `limits.max_output_bytes`, `limits.max_memory_bytes`,
//! `limits.max_window_bytes` and `limits.max_expansion_ratio`.

use crate::error::CompressError;

/// Default decompression-bomb guard: output may not exceed 1000x the
/// consumed input.
pub const DEFAULT_MAX_EXPANSION_RATIO: u64 = 1000;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Limits
{
    max_output_bytes:    u64,
    max_memory_bytes:    u64,
    max_window_bytes:    u64,
    max_expansion_ratio: u64
}

impl Default for Limits
{
    fn default() -> Self
    {
        Limits {
            max_output_bytes:    0,
            max_memory_bytes:    0,
            max_window_bytes:    0,
            max_expansion_ratio: DEFAULT_MAX_EXPANSION_RATIO
        }
    }
}

impl Limits
{
    pub const fn get_max_output_bytes(&self) -> u64
    {
        self.max_output_bytes
    }

    pub const fn get_max_memory_bytes(&self) -> u64
    {
        self.max_memory_bytes
    }

    pub const fn get_max_window_bytes(&self) -> u64
    {
        self.max_window_bytes
    }

    pub const fn get_max_expansion_ratio(&self) -> u64
    {
        self.max_expansion_ratio
    }

    /// Cap the total number of decompressed bytes. 0 is unlimited.
    pub fn set_max_output_bytes(mut self, bytes: u64) -> Self
    {
        self.max_output_bytes = bytes;
        self
    }

    /// Cap the memory a codec may allocate at creation. 0 is unlimited.
    pub fn set_max_memory_bytes(mut self, bytes: u64) -> Self
    {
        self.max_memory_bytes = bytes;
        self
    }

    /// Cap the decoder history window size. 0 is unlimited.
    pub fn set_max_window_bytes(mut self, bytes: u64) -> Self
    {
        self.max_window_bytes = bytes;
        self
    }

    /// Cap the running output/input ratio during decompression.
    /// 0 is unlimited.
    pub fn set_max_expansion_ratio(mut self, ratio: u64) -> Self
    {
        self.max_expansion_ratio = ratio;
        self
    }

    /// Fail with `Limit` if `total_output` exceeds the output cap.
    pub fn check_output(&self, total_output: u64) -> Result<(), CompressError>
    {
        if self.max_output_bytes != 0 && total_output > self.max_output_bytes
        {
            return Err(CompressError::limit(format!(
                "output size {} exceeds limit {}",
                total_output, self.max_output_bytes
            )));
        }
        Ok(())
    }

    /// Fail with `Limit` if a creation-time allocation exceeds the
    /// memory cap.
    pub fn check_memory(&self, bytes: u64) -> Result<(), CompressError>
    {
        if self.max_memory_bytes != 0 && bytes > self.max_memory_bytes
        {
            return Err(CompressError::limit(format!(
                "codec requires {} bytes, memory limit is {}",
                bytes, self.max_memory_bytes
            )));
        }
        Ok(())
    }

    /// Fail with `Limit` if the requested window exceeds the window cap.
    pub fn check_window(&self, window_bytes: u64) -> Result<(), CompressError>
    {
        if self.max_window_bytes != 0 && window_bytes > self.max_window_bytes
        {
            return Err(CompressError::limit(format!(
                "window size {} exceeds limit {}",
                window_bytes, self.max_window_bytes
            )));
        }
        Ok(())
    }

    /// Fail with `Limit` once `total_output / max(total_input, 1)`
    /// exceeds the configured ratio.
    pub fn check_expansion(
        &self, total_input: u64, total_output: u64
    ) -> Result<(), CompressError>
    {
        if self.max_expansion_ratio == 0
        {
            return Ok(());
        }

        let divisor = total_input.max(1);

        if total_output / divisor > self.max_expansion_ratio
        {
            return Err(CompressError::limit(format!(
                "expansion ratio exceeds limit {} (input={}, output={})",
                self.max_expansion_ratio, total_input, total_output
            )));
        }
        Ok(())
    }
}
