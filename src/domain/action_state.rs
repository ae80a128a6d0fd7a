/// User-triggered backend actions that carry an in-flight guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Chat,
    Upload,
    Ingest,
    Clear,
}

impl ActionKind {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Upload => "upload",
            Self::Ingest => "ingest",
            Self::Clear => "clear",
        }
    }
}

/// One flag per action; an action cannot be started while its flag is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InFlightActions {
    chat: bool,
    upload: bool,
    ingest: bool,
    clear: bool,
}

impl InFlightActions {
    pub fn is_busy(&self, action: ActionKind) -> bool {
        *self.flag(action)
    }

    pub fn any_busy(&self) -> bool {
        self.chat || self.upload || self.ingest || self.clear
    }

    /// Marks `action` as started. Returns `false` if it was already in flight.
    pub fn try_begin(&mut self, action: ActionKind) -> bool {
        let flag = self.flag_mut(action);
        if *flag {
            return false;
        }

        *flag = true;
        true
    }

    pub fn finish(&mut self, action: ActionKind) {
        *self.flag_mut(action) = false;
    }

    fn flag(&self, action: ActionKind) -> &bool {
        match action {
            ActionKind::Chat => &self.chat,
            ActionKind::Upload => &self.upload,
            ActionKind::Ingest => &self.ingest,
            ActionKind::Clear => &self.clear,
        }
    }

    fn flag_mut(&mut self, action: ActionKind) -> &mut bool {
        match action {
            ActionKind::Chat => &mut self.chat,
            ActionKind::Upload => &mut self.upload,
            ActionKind::Ingest => &mut self.ingest,
            ActionKind::Clear => &mut self.clear,
        }
    }
}
