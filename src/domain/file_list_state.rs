/// Stable handle of one file-list row, independent of its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

impl EntryId {
    #[cfg(test)]
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Uploading,
    Ingesting,
    Success,
    Error,
}

impl FileStatus {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Uploading => "uploading",
            Self::Ingesting => "ingesting",
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }

    /// Terminal status for a settled call.
    pub fn settled(succeeded: bool) -> Self {
        if succeeded {
            Self::Success
        } else {
            Self::Error
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileListEntry {
    pub id: EntryId,
    pub name: String,
    pub status: FileStatus,
}

/// Visible list of upload/ingest rows, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileListState {
    entries: Vec<FileListEntry>,
    next_id: u64,
    selected_index: Option<usize>,
}

impl FileListState {
    pub fn entries(&self) -> &[FileListEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn entry(&self, id: EntryId) -> Option<&FileListEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Prepends a new row and returns its handle.
    pub fn add(&mut self, name: impl Into<String>, status: FileStatus) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;

        self.entries.insert(
            0,
            FileListEntry {
                id,
                name: name.into(),
                status,
            },
        );

        if let Some(index) = self.selected_index.as_mut() {
            *index += 1;
        }

        id
    }

    /// Moves a pending row to its terminal status.
    ///
    /// Returns `false` when the row is gone (list was cleared) or already
    /// settled; such updates are dropped.
    pub fn settle(&mut self, id: EntryId, status: FileStatus) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) else {
            return false;
        };

        if entry.status.is_terminal() || !status.is_terminal() {
            return false;
        }

        entry.status = status;
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.selected_index = None;
    }

    pub fn select_next(&mut self) {
        if self.entries.is_empty() {
            return;
        }

        self.selected_index = match self.selected_index {
            None => Some(0),
            Some(index) if index + 1 < self.entries.len() => Some(index + 1),
            Some(index) => Some(index),
        };
    }

    pub fn select_previous(&mut self) {
        if self.entries.is_empty() {
            return;
        }

        self.selected_index = match self.selected_index {
            None | Some(0) => Some(0),
            Some(index) => Some(index - 1),
        };
    }
}
