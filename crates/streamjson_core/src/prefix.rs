//! Variable-prefix mode: `name={...}` instead of `{...}`.

use crate::buffer::{header_bytes, StreamJson};
use crate::error::BufferResult;
use tracing::debug;

impl StreamJson {
    /// Returns the active variable prefix.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Sets or clears the variable prefix.
    ///
    /// An object without members is recreated as `{}` or `name={}`.
    /// Otherwise the header is rewritten in place and every member offset,
    /// the length and the cursor move by the change in header length.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::BufferError::StoreUnavailable`] once closed or
    /// detached.
    pub fn set_prefix(&mut self, prefix: Option<&str>) -> BufferResult<()> {
        self.ensure_available()?;

        if self.index.is_empty() {
            self.prefix = prefix.map(str::to_owned);
            self.reset_empty()?;
            debug!(prefix = ?self.prefix, "prefix set on empty object");
            return Ok(());
        }

        if self.prefix.as_deref() == prefix {
            return Ok(());
        }

        let old_header = header_bytes(self.prefix.as_deref());
        let new_header = header_bytes(prefix);
        self.store_mut()?
            .splice(0, old_header.len() as u64, &new_header)?;

        let adjust = new_header.len() as i64 - old_header.len() as i64;
        self.index.shift(adjust);
        self.length = self.length.saturating_add_signed(adjust);
        self.cursor = self.cursor.saturating_add_signed(adjust).min(self.length);
        self.prefix = prefix.map(str::to_owned);

        debug!(prefix = ?self.prefix, adjust, length = self.length, "rewrote prefix");
        Ok(())
    }
}
