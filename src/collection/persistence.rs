use tracing::{Level, debug, event, info_span, warn};
use crate::core::{CollectionError, Result};
use crate::model::{Model, SaveOptions};
use super::{Collection, RECORDS};

impl<M: Model> Collection<M> {
    /// Runs collection rules, then asks every member to validate.
    ///
    /// Members are always all visited so that each one's own errors are
    /// populated; only the boolean result is folded. The collection's errors are
    /// rebuilt from scratch, so repeated calls without mutation agree.
    pub fn validate(&mut self) -> bool {
        self.errors.clear();
        for rule in self.definition.rules() {
            rule.check(&self.records, &mut self.errors);
        }
        let mut valid = self.errors.is_empty();

        if self.records.is_empty() {
            self.errors
                .add(RECORDS, self.definition.config().blank_message.clone());
            valid = false;
        } else {
            let members_valid = self
                .records
                .iter_mut()
                .fold(true, |all_valid, record| record.validate() && all_valid);
            valid = valid && members_valid;
        }

        debug!(
            collection = %self.name(),
            records = self.records.len(),
            valid,
            "validated collection"
        );
        valid
    }

    /// Saves with default options (validation on).
    pub fn save(&mut self) -> bool {
        self.save_with(&SaveOptions::default())
    }

    /// Validates (unless disabled), then saves every member in order.
    ///
    /// Returns `true` only when every member saved. A failed member does not
    /// stop later members from being saved.
    pub fn save_with(&mut self, options: &SaveOptions) -> bool {
        let span = info_span!(
            "collection_save",
            collection = %self.name(),
            records = self.records.len(),
            validate = options.validate
        );
        let _guard = span.enter();

        if options.validate && !self.validate() {
            debug!("collection invalid, nothing persisted");
            return false;
        }
        if self.records.is_empty() {
            return false;
        }

        let mut failed = 0usize;
        for (index, record) in self.records.iter_mut().enumerate() {
            if !record.save(options) {
                failed += 1;
                warn!(index, key = %record.id(), "member save failed");
            }
        }

        event!(
            Level::DEBUG,
            saved = self.records.len() - failed,
            failed,
            "collection save finished"
        );
        failed == 0
    }

    /// Saves with default options, failing instead of returning `false`.
    pub fn save_strict(&mut self) -> Result<()> {
        self.save_strict_with(&SaveOptions::default())
    }

    /// Strict save: invalid collections fail with every collection and member
    /// message; otherwise each member's own strict save runs in order and the
    /// first failure propagates.
    pub fn save_strict_with(&mut self, options: &SaveOptions) -> Result<()> {
        let span = info_span!(
            "collection_save_strict",
            collection = %self.name(),
            records = self.records.len(),
            validate = options.validate
        );
        let _guard = span.enter();

        let valid = if options.validate {
            self.validate()
        } else if self.records.is_empty() {
            self.errors.clear();
            self.errors
                .add(RECORDS, self.definition.config().blank_message.clone());
            false
        } else {
            true
        };
        if !valid {
            return Err(CollectionError::PersistFailed(
                self.failure_messages().join("; "),
            ));
        }

        for record in self.records.iter_mut() {
            record.save_strict(options)?;
        }
        debug!("collection persisted");
        Ok(())
    }

    /// Collection messages followed by every member's full messages, in order.
    pub fn failure_messages(&self) -> Vec<String> {
        let mut messages = self.errors.full_messages();
        for record in &self.records {
            messages.extend(record.errors().full_messages());
        }
        messages
    }
}
