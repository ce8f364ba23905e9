//! Dictionary view: set, get and delete whole members.
//!
//! Members are appended before the closing brace and located later through
//! the offset index. Overwriting a key rebuilds the object without the old
//! member and appends the new one, so an updated key moves to the end.

use crate::buffer::{header_bytes, StreamJson};
use crate::error::{BufferError, BufferResult};
use crate::index::{IndexEntry, ValueShape};
use crate::stream::Whence;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use streamjson_storage::{copy_range, StorageBackend};
use tracing::{debug, trace};

impl StreamJson {
    /// Returns `true` if `key` is a member.
    ///
    /// An inert buffer has no members.
    #[must_use]
    pub fn exists(&self, key: &str) -> bool {
        self.index.exists(key)
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the object has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Member keys in serialization order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.index.keys()
    }

    /// Index entry of a member.
    #[must_use]
    pub fn entry(&self, key: &str) -> Option<IndexEntry> {
        self.index.get(key).copied()
    }

    /// Sets `key` to the JSON serialization of `value`.
    ///
    /// The member is written as the last member of the object. Overwriting
    /// an existing key rebuilds the object into a new store without the old
    /// member and with the new one at the end; the old store is only
    /// replaced once the rebuild has succeeded.
    ///
    /// # Errors
    ///
    /// Fails with [`BufferError::StoreUnavailable`] once closed or detached,
    /// with [`BufferError::Json`] if `value` cannot be serialized and with
    /// [`BufferError::WriteFailed`] if the store rejects the new member. In
    /// each case the content, length and cursor are left unchanged.
    pub fn set<T>(&mut self, key: &str, value: &T) -> BufferResult<()>
    where
        T: Serialize + ?Sized,
    {
        self.ensure_available()?;

        let value = serde_json::to_value(value)?;
        let shape = ValueShape::of(&value);
        let mut member = serde_json::to_vec(key)?;
        member.push(b':');
        serde_json::to_writer(&mut member, &value)?;

        if self.index.exists(key) {
            return self.rebuild(key, Some((&member, shape)));
        }

        let separated = !self.index.is_empty();
        let mut text = Vec::with_capacity(member.len() + 1);
        if separated {
            text.push(b',');
        }
        text.extend_from_slice(&member);

        let resume = self.cursor;
        let at = self.seek(-1, Whence::End)?;
        if let Err(err) = self.write(&text) {
            self.cursor = resume;
            return Err(err);
        }

        let start = at + u64::from(separated);
        self.index.put(
            key,
            IndexEntry {
                start,
                len: member.len() as u64,
                shape,
            },
        );
        trace!(key, start, len = member.len(), ?shape, "set member");
        Ok(())
    }

    /// Returns the value of `key`, or `None` if it is not a member.
    ///
    /// The cursor is left just after the member.
    ///
    /// # Errors
    ///
    /// Fails with [`BufferError::StoreUnavailable`] once closed or detached
    /// and with [`BufferError::Corrupted`] if the indexed bytes no longer
    /// hold the member (for example after raw stream writes inside the
    /// object).
    pub fn get(&mut self, key: &str) -> BufferResult<Option<Value>> {
        self.ensure_available()?;
        let Some(entry) = self.index.get(key).copied() else {
            return Ok(None);
        };

        let literal = self.value_literal(key, &entry)?;
        let value: Value = serde_json::from_slice(&literal)
            .map_err(|err| BufferError::corrupted(key, err.to_string()))?;

        if ValueShape::of(&value) != entry.shape {
            return Err(BufferError::corrupted(
                key,
                format!("expected {:?} value, found {value}", entry.shape),
            ));
        }
        Ok(Some(value))
    }

    /// Returns the value of `key` deserialized into `T`.
    ///
    /// # Errors
    ///
    /// As [`StreamJson::get`], plus [`BufferError::Json`] if the value does
    /// not fit `T`.
    pub fn get_as<T: DeserializeOwned>(&mut self, key: &str) -> BufferResult<Option<T>> {
        match self.get(key)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Reads the member text of `entry` and strips the key literal and colon.
    fn value_literal(&mut self, key: &str, entry: &IndexEntry) -> BufferResult<Vec<u8>> {
        let key_literal = serde_json::to_vec(key)?;
        self.seek(entry.start as i64, Whence::Start)?;
        let mut raw = self.read(entry.len as usize)?;

        let skip = key_literal.len() + 1;
        if raw.len() < skip || !raw.starts_with(&key_literal) || raw[key_literal.len()] != b':' {
            return Err(BufferError::corrupted(
                key,
                format!("no key literal at offset {}", entry.start),
            ));
        }
        Ok(raw.split_off(skip))
    }

    /// Removes `key` from the object. Removing a missing key does nothing.
    ///
    /// Deleting the only member of an object without prefix resets the
    /// buffer to `{}`. Otherwise the object is rebuilt into a new store
    /// without the member, and the start of every remaining member is
    /// recomputed. The cursor ends up just inside the closing brace.
    ///
    /// # Errors
    ///
    /// Fails with [`BufferError::StoreUnavailable`] once closed or detached.
    pub fn delete(&mut self, key: &str) -> BufferResult<()> {
        self.ensure_available()?;
        if !self.index.exists(key) {
            return Ok(());
        }

        if self.index.len() == 1 && self.prefix.is_none() {
            self.reset_empty()?;
            debug!(key, "deleted last member, buffer reset");
            return Ok(());
        }

        self.rebuild(key, None)
    }

    /// Copies every member except `key` into a fresh store, then appends
    /// `replacement` (if any) under `key` as the last member.
    ///
    /// The buffer switches to the fresh store only after it is complete.
    fn rebuild(
        &mut self,
        key: &str,
        replacement: Option<(&[u8], ValueShape)>,
    ) -> BufferResult<()> {
        let mut header = header_bytes(self.prefix.as_deref());
        header.push(b'{');

        let mut fresh = self.config.open_backend()?;
        fresh.append(&header)?;

        let old = self.store()?;
        let mut written = header.len() as u64;
        // Walks the old store member by member; `read_pos` skips the
        // separator in front of every member but the first.
        let mut read_pos = header.len() as u64;
        let mut relocated: Vec<(String, u64)> = Vec::with_capacity(self.index.len());

        for (i, (member, entry)) in self.index.iter().enumerate() {
            if i > 0 {
                read_pos += 1;
            }
            if member == key {
                read_pos += entry.len;
                continue;
            }
            if !relocated.is_empty() {
                fresh.append(b",")?;
                written += 1;
            }
            copy_range(old, read_pos, entry.len, &mut *fresh)?;
            relocated.push((member.to_owned(), written));
            written += entry.len;
            read_pos += entry.len;
        }

        let mut appended = None;
        if let Some((text, shape)) = replacement {
            if !relocated.is_empty() {
                fresh.append(b",")?;
                written += 1;
            }
            fresh.append(text)?;
            appended = Some(IndexEntry {
                start: written,
                len: text.len() as u64,
                shape,
            });
            written += text.len() as u64;
        }

        fresh.append(b"}")?;
        written += 1;

        self.index.remove(key);
        for (member, start) in &relocated {
            self.index.relocate(member, *start);
        }
        if let Some(entry) = appended {
            self.index.put(key, entry);
        }
        self.store = Some(fresh);
        self.length = written;
        self.cursor = written - 1;

        debug!(
            key,
            kept = relocated.len(),
            replaced = appended.is_some(),
            length = written,
            "rebuilt store"
        );
        Ok(())
    }
}
