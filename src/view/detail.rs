use super::{RemoteData, RequestToken};

/// An issued save: send `record` to the controller, then hand the response
/// back through `resolve_save` with the same token.
#[derive(Debug, Clone)]
pub struct SaveRequest<T> {
    pub token: RequestToken,
    pub record: T,
}

/// Detail screen state: the last-confirmed server record plus an optional
/// draft being edited. Saving disables resubmission while in flight, and the
/// confirmed state is only ever replaced by a controller *response* - never
/// by the draft itself - so server-derived fields (timestamps, defaults)
/// always come back authoritative.
#[derive(Debug)]
pub struct DetailState<T> {
    data: RemoteData<T>,
    draft: Option<T>,
    save_in_flight: bool,
    error: Option<String>,
    generation: u64,
    attached: bool,
}

impl<T: Clone> DetailState<T> {
    pub fn new() -> Self {
        Self {
            data: RemoteData::Idle,
            draft: None,
            save_in_flight: false,
            error: None,
            generation: 0,
            attached: true,
        }
    }

    pub fn begin_load(&mut self) -> RequestToken {
        self.generation += 1;
        self.data = RemoteData::Loading;
        self.error = None;
        RequestToken(self.generation)
    }

    pub fn resolve_load(&mut self, token: RequestToken, result: Result<T, String>) {
        if !self.attached || token.0 != self.generation {
            return;
        }
        self.data = match result {
            Ok(record) => RemoteData::Loaded(record),
            Err(message) => RemoteData::Failed(message),
        };
    }

    /// Last-confirmed server state.
    pub fn record(&self) -> Option<&T> {
        self.data.value()
    }

    pub fn is_loading(&self) -> bool {
        self.data.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.data.error().or(self.error.as_deref())
    }

    // ========================================
    // Draft editing
    // ========================================

    /// Copy server state into a draft. No-op while nothing is loaded or a
    /// save is still in flight.
    pub fn begin_edit(&mut self) -> bool {
        if self.save_in_flight {
            return false;
        }
        match self.data.value() {
            Some(record) => {
                self.draft = Some(record.clone());
                true
            }
            None => false,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    pub fn draft(&self) -> Option<&T> {
        self.draft.as_ref()
    }

    /// Mutable access for form bindings.
    pub fn draft_mut(&mut self) -> Option<&mut T> {
        self.draft.as_mut()
    }

    /// Throw the draft away; the last-fetched state stands.
    pub fn cancel_edit(&mut self) {
        self.draft = None;
        self.error = None;
    }

    /// Whether the save control should be enabled.
    pub fn can_submit(&self) -> bool {
        self.draft.is_some() && !self.save_in_flight
    }

    /// Submit the draft. Returns `None` (control disabled) when there is no
    /// draft or a save is already in flight.
    pub fn submit_save(&mut self) -> Option<SaveRequest<T>> {
        if self.save_in_flight {
            return None;
        }
        let record = self.draft.clone()?;
        self.generation += 1;
        self.save_in_flight = true;
        self.error = None;
        Some(SaveRequest { token: RequestToken(self.generation), record })
    }

    /// Apply a save response. Only the response of the latest submitted
    /// mutation lands; on success local state becomes the server's record,
    /// on failure the draft stays up for correction.
    pub fn resolve_save(&mut self, token: RequestToken, result: Result<T, String>) {
        if !self.attached || token.0 != self.generation {
            return;
        }
        self.save_in_flight = false;
        match result {
            Ok(record) => {
                self.data = RemoteData::Loaded(record);
                self.draft = None;
                self.error = None;
            }
            Err(message) => {
                self.error = Some(message);
            }
        }
    }

    pub fn is_saving(&self) -> bool {
        self.save_in_flight
    }

    /// The user navigated away: pending responses must not touch this state.
    pub fn detach(&mut self) {
        self.attached = false;
    }
}

impl<T: Clone> Default for DetailState<T> {
    fn default() -> Self {
        Self::new()
    }
}
