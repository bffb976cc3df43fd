//! In-memory append-only entry log.
//!
//! Lock order, everywhere: `entries` shard guard, then `sequences`. The
//! lettering mutex is taken before any entry guard. A `sources` guard may
//! wait on `reversals`, never the reverse, and neither waits on `entries`.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use ohada_shared::types::{AccountId, ActorId, DocumentId, EntryId, EntryLineId};
use parking_lot::Mutex;

use super::entry::{EntryLine, JournalEntry, Lettering};
use super::error::LedgerError;
use super::reconciliation::{check_selection, lettering_code};
use super::types::{JournalCode, SourceDocument};

/// Storage for journal entries with single-writer transitions per entry.
#[derive(Debug, Default)]
pub struct JournalStore {
    entries: DashMap<EntryId, JournalEntry>,
    line_index: DashMap<EntryLineId, EntryId>,
    sequences: DashMap<JournalCode, u64>,
    reversals: DashMap<EntryId, EntryId>,
    sources: DashMap<(&'static str, DocumentId), EntryId>,
    lettering: Mutex<HashMap<AccountId, u64>>,
}

impl JournalStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_sequence(&self, journal: JournalCode) -> u64 {
        let mut seq = self.sequences.entry(journal).or_insert(0);
        *seq += 1;
        *seq
    }

    fn index_lines(&self, entry: &JournalEntry) {
        for line in &entry.lines {
            self.line_index.insert(line.id, entry.id);
        }
    }

    /// Stores a draft.
    pub fn insert_draft(&self, entry: JournalEntry) -> JournalEntry {
        self.index_lines(&entry);
        self.entries.insert(entry.id, entry.clone());
        entry
    }

    /// Assigns the next sequence, stamps and stores an entry as validated.
    pub fn insert_validated(&self, mut entry: JournalEntry, actor: ActorId) -> JournalEntry {
        let sequence = self.next_sequence(entry.journal);
        entry.mark_validated(sequence, actor, Utc::now());
        self.index_lines(&entry);
        self.entries.insert(entry.id, entry.clone());
        entry
    }

    /// Whether `entry_id` still stands: its chain of reversals has even length.
    fn is_live(&self, entry_id: EntryId) -> bool {
        let mut live = true;
        let mut current = entry_id;
        while let Some(next) = self.reversed_by(current) {
            live = !live;
            current = next;
        }
        live
    }

    /// First entry of a reversal chain, following `origin_entry` links.
    #[must_use]
    pub fn chain_root(&self, entry: &JournalEntry) -> EntryId {
        let mut root = entry.id;
        let mut origin = entry.origin_entry;
        while let Some(id) = origin {
            root = id;
            origin = self.entries.get(&id).and_then(|e| e.origin_entry);
        }
        root
    }

    /// Records that `entry_id` posts `source`.
    ///
    /// A document may only be posted again once its previous entry no longer
    /// stands.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateSourceDocument` otherwise.
    pub fn claim_source(&self, source: &SourceDocument, entry_id: EntryId) -> Result<(), LedgerError> {
        let Some(document_id) = source.document_id() else {
            return Ok(());
        };
        match self.sources.entry((source.kind(), document_id)) {
            Entry::Occupied(mut existing) => {
                if self.is_live(*existing.get()) {
                    Err(LedgerError::DuplicateSourceDocument(
                        source.number().unwrap_or_default().to_string(),
                    ))
                } else {
                    existing.insert(entry_id);
                    Ok(())
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(entry_id);
                Ok(())
            }
        }
    }

    /// Links `origin` to its reversal. Only one reversal per entry wins.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyReversed` if a reversal is already recorded.
    pub fn claim_reversal(&self, origin: EntryId, reversal: EntryId) -> Result<(), LedgerError> {
        match self.reversals.entry(origin) {
            Entry::Occupied(_) => Err(LedgerError::AlreadyReversed(origin)),
            Entry::Vacant(slot) => {
                slot.insert(reversal);
                Ok(())
            }
        }
    }

    /// Links a reversal entry to its own reversal, which reinstates `root`.
    ///
    /// The document claim moves back to `root` under the same guard, so a
    /// concurrent repost cannot slip in between.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateSourceDocument` if the document was posted again
    /// since `root` was cancelled, or `AlreadyReversed`.
    pub fn claim_reinstating_reversal(
        &self,
        source: &SourceDocument,
        root: EntryId,
        target: EntryId,
        reversal: EntryId,
    ) -> Result<(), LedgerError> {
        let Some(document_id) = source.document_id() else {
            return self.claim_reversal(target, reversal);
        };
        let mut claimed = self.sources.entry((source.kind(), document_id)).or_insert(root);
        if *claimed != root && self.is_live(*claimed) {
            return Err(LedgerError::DuplicateSourceDocument(
                source.number().unwrap_or_default().to_string(),
            ));
        }
        self.claim_reversal(target, reversal)?;
        *claimed = root;
        Ok(())
    }

    /// The entry reversing `origin`, if any.
    #[must_use]
    pub fn reversed_by(&self, origin: EntryId) -> Option<EntryId> {
        self.reversals.get(&origin).map(|r| *r)
    }

    /// Copy of an entry, soft-deleted drafts excluded.
    #[must_use]
    pub fn get(&self, id: EntryId) -> Option<JournalEntry> {
        self.entries
            .get(&id)
            .filter(|e| e.deleted_at.is_none())
            .map(|e| e.value().clone())
    }

    /// Validates a draft under its write guard.
    ///
    /// `check` runs while the guard is held, so exactly one concurrent caller
    /// can observe the draft status and flip it.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `AlreadyValidated`, or whatever `check` returns.
    pub fn validate_draft<F>(&self, id: EntryId, actor: ActorId, check: F) -> Result<JournalEntry, LedgerError>
    where
        F: FnOnce(&JournalEntry) -> Result<(), LedgerError>,
    {
        let mut entry = self
            .entries
            .get_mut(&id)
            .filter(|e| e.deleted_at.is_none())
            .ok_or(LedgerError::EntryNotFound(id))?;
        if entry.is_validated() {
            return Err(LedgerError::AlreadyValidated(id));
        }
        check(entry.value())?;

        let sequence = self.next_sequence(entry.journal);
        entry.mark_validated(sequence, actor, Utc::now());
        Ok(entry.value().clone())
    }

    /// Applies `edit` to a draft.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `AlreadyValidated`, or the error of `edit`.
    pub fn update_draft<F>(&self, id: EntryId, edit: F) -> Result<JournalEntry, LedgerError>
    where
        F: FnOnce(&mut JournalEntry) -> Result<(), LedgerError>,
    {
        let mut entry = self
            .entries
            .get_mut(&id)
            .filter(|e| e.deleted_at.is_none())
            .ok_or(LedgerError::EntryNotFound(id))?;
        if entry.is_validated() {
            return Err(LedgerError::AlreadyValidated(id));
        }

        let old_lines: Vec<EntryLineId> = entry.lines.iter().map(|l| l.id).collect();
        edit(entry.value_mut())?;
        for line_id in old_lines {
            self.line_index.remove(&line_id);
        }
        for line in &entry.lines {
            self.line_index.insert(line.id, id);
        }
        Ok(entry.value().clone())
    }

    /// Soft-deletes a draft.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` or `AlreadyValidated`.
    pub fn delete_draft(&self, id: EntryId, at: DateTime<Utc>) -> Result<JournalEntry, LedgerError> {
        self.update_draft(id, |entry| {
            entry.deleted_at = Some(at);
            Ok(())
        })
    }

    /// Letters the selected lines of `account_id` with one fresh code.
    ///
    /// Lines on other accounts or in unvalidated entries are ignored. The
    /// whole selection is stamped or nothing is.
    ///
    /// # Errors
    ///
    /// Returns `LineNotFound` for unknown ids and the selection errors of
    /// [`check_selection`].
    pub fn reconcile(
        &self,
        account_id: AccountId,
        line_ids: &[EntryLineId],
        date: NaiveDate,
    ) -> Result<(String, Vec<EntryLineId>), LedgerError> {
        let mut counters = self.lettering.lock();

        let mut wanted = line_ids.to_vec();
        wanted.sort_unstable();
        wanted.dedup();

        let mut selected: Vec<(EntryId, EntryLine)> = Vec::with_capacity(wanted.len());
        for line_id in wanted {
            let entry_id = self
                .line_index
                .get(&line_id)
                .map(|e| *e)
                .ok_or(LedgerError::LineNotFound(line_id))?;
            let Some(entry) = self.entries.get(&entry_id) else {
                continue;
            };
            if !entry.is_validated() {
                continue;
            }
            if let Some(line) = entry
                .lines
                .iter()
                .find(|l| l.id == line_id && l.account_id == account_id)
            {
                selected.push((entry_id, line.clone()));
            }
        }

        let lines: Vec<&EntryLine> = selected.iter().map(|(_, line)| line).collect();
        check_selection(&lines)?;

        let counter = counters.entry(account_id).or_insert(0);
        let code = lettering_code(*counter);
        *counter += 1;

        for (entry_id, line) in &selected {
            if let Some(mut entry) = self.entries.get_mut(entry_id)
                && let Some(stored) = entry.lines.iter_mut().find(|l| l.id == line.id)
            {
                stored.lettering = Some(Lettering {
                    code: code.clone(),
                    date,
                });
            }
        }

        Ok((code, selected.into_iter().map(|(_, line)| line.id).collect()))
    }

    /// Clears a lettering code on an account, returning how many lines it had.
    ///
    /// # Errors
    ///
    /// Returns `ReconciliationNotFound` when no line carries the code.
    pub fn unreconcile(&self, account_id: AccountId, account_code: &str, code: &str) -> Result<usize, LedgerError> {
        let _counters = self.lettering.lock();
        let mut cleared = 0;
        for mut entry in self.entries.iter_mut() {
            for line in entry.lines.iter_mut().filter(|l| l.account_id == account_id) {
                if line.lettering.as_ref().is_some_and(|l| l.code == code) {
                    line.lettering = None;
                    cleared += 1;
                }
            }
        }
        if cleared == 0 {
            return Err(LedgerError::ReconciliationNotFound {
                account: account_code.to_string(),
                code: code.to_string(),
            });
        }
        Ok(cleared)
    }

    /// Validated entries ordered by date, journal and sequence.
    #[must_use]
    pub fn validated_entries(&self) -> Vec<JournalEntry> {
        let mut entries: Vec<JournalEntry> = self
            .entries
            .iter()
            .filter(|e| e.is_validated())
            .map(|e| e.value().clone())
            .collect();
        entries.sort_by(|a, b| {
            (a.date, a.journal, a.sequence).cmp(&(b.date, b.journal, b.sequence))
        });
        entries
    }

    /// Live drafts ordered by creation time.
    #[must_use]
    pub fn drafts(&self) -> Vec<JournalEntry> {
        let mut drafts: Vec<JournalEntry> = self
            .entries
            .iter()
            .filter(|e| e.is_draft())
            .map(|e| e.value().clone())
            .collect();
        drafts.sort_by_key(|e| e.created_at);
        drafts
    }

    /// Returns true if any live entry has a line on the account.
    #[must_use]
    pub fn has_lines_for(&self, account_id: AccountId) -> bool {
        self.entries.iter().any(|e| {
            e.deleted_at.is_none() && e.lines.iter().any(|l| l.account_id == account_id)
        })
    }

    /// Number of live entries (drafts included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.deleted_at.is_none()).count()
    }

    /// Returns true if nothing was ever stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
