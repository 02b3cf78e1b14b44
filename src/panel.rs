//! Draft/Snapshot bookkeeping shared by every settings panel.
//!
//! A [`Panel`] is an immutable value; each transition is a pure call to
//! [`Panel::reduce`]. Results of network calls carry the [`Epoch`] that was
//! current when the call started, so a result landing after the panel was
//! unmounted (or remounted) is dropped instead of resurrecting old state.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelState {
    Uninitialized,
    Loading,
    Ready,
    Saving,
    SaveFailed,
}

/// Mount generation of a panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Epoch(u64);

#[derive(Clone, Debug, PartialEq)]
pub enum PanelEvent<T> {
    /// Mount or first expand. Ignored unless the panel is uninitialized.
    LoadRequested,
    /// Explicit re-fetch of an already loaded panel.
    RefreshRequested,
    Loaded { epoch: Epoch, value: T },
    LoadFailed { epoch: Epoch },
    /// Replace the draft with an edited value.
    Edited(T),
    /// Validation passed and `submitted` is about to be posted.
    SaveRequested { submitted: T },
    Saved { epoch: Epoch },
    SaveFailed { epoch: Epoch },
    Unmounted,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Panel<T> {
    state: PanelState,
    epoch: Epoch,
    draft: Option<T>,
    snapshot: Option<T>,
    pending: Option<T>,
}

impl<T> Default for Panel<T> {
    fn default() -> Self {
        Self {
            state: PanelState::Uninitialized,
            epoch: Epoch::default(),
            draft: None,
            snapshot: None,
            pending: None,
        }
    }
}

impl<T: Clone> Panel<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn draft(&self) -> Option<&T> {
        self.draft.as_ref()
    }

    pub fn snapshot(&self) -> Option<&T> {
        self.snapshot.as_ref()
    }

    /// Whether the draft accepts edits and saves.
    pub fn is_editable(&self) -> bool {
        matches!(self.state, PanelState::Ready | PanelState::SaveFailed)
    }

    pub fn reduce(self, event: PanelEvent<T>) -> Self {
        use PanelEvent as E;
        use PanelState as S;

        match (self.state, event) {
            (S::Uninitialized, E::LoadRequested) => Self {
                state: S::Loading,
                ..self
            },
            (S::Ready | S::SaveFailed, E::RefreshRequested) => Self {
                state: S::Loading,
                ..self
            },
            (S::Loading, E::Loaded { epoch, value }) if epoch == self.epoch => Self {
                state: S::Ready,
                draft: Some(value.clone()),
                snapshot: Some(value),
                ..self
            },
            // A refresh that fails keeps whatever was on screen
            (S::Loading, E::LoadFailed { epoch }) if epoch == self.epoch => {
                if self.snapshot.is_some() {
                    Self {
                        state: S::Ready,
                        ..self
                    }
                } else {
                    Self {
                        state: S::Uninitialized,
                        draft: None,
                        ..self
                    }
                }
            }
            (S::Ready | S::SaveFailed, E::Edited(value)) => Self {
                state: S::Ready,
                draft: Some(value),
                ..self
            },
            (S::Ready | S::SaveFailed, E::SaveRequested { submitted }) => Self {
                state: S::Saving,
                pending: Some(submitted),
                ..self
            },
            (S::Saving, E::Saved { epoch }) if epoch == self.epoch => Self {
                state: S::Ready,
                snapshot: self.pending.or(self.snapshot),
                pending: None,
                ..self
            },
            (S::Saving, E::SaveFailed { epoch }) if epoch == self.epoch => Self {
                state: S::SaveFailed,
                pending: None,
                ..self
            },
            (_, E::Unmounted) => Self {
                epoch: Epoch(self.epoch.0 + 1),
                ..Self::default()
            },
            _ => self,
        }
    }

    /// In-place form of [`reduce`](Self::reduce).
    pub fn apply(&mut self, event: PanelEvent<T>) {
        *self = std::mem::take(self).reduce(event);
    }
}

impl<T: Clone> Panel<T> {
    /// Marks the request just started by `Loading` or `Saving` as in flight.
    /// The returned guard fails the request if it is dropped unsettled.
    pub fn in_flight(&mut self) -> InFlight<'_, T> {
        let epoch = self.epoch;
        let abandon = match self.state {
            PanelState::Loading => Some(PanelEvent::LoadFailed { epoch }),
            PanelState::Saving => Some(PanelEvent::SaveFailed { epoch }),
            _ => None,
        };
        InFlight {
            panel: self,
            epoch,
            abandon,
        }
    }
}

/// Exclusive hold on a panel while its request is awaited.
pub struct InFlight<'a, T: Clone> {
    panel: &'a mut Panel<T>,
    epoch: Epoch,
    abandon: Option<PanelEvent<T>>,
}

impl<T: Clone> InFlight<'_, T> {
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn settle(mut self, event: PanelEvent<T>) {
        self.abandon = None;
        self.panel.apply(event);
    }
}

impl<T: Clone> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if let Some(event) = self.abandon.take() {
            log::debug!("Request abandoned in flight, panel state was {:?}", self.panel.state());
            self.panel.apply(event);
        }
    }
}

impl<T: Clone + PartialEq> Panel<T> {
    /// Whether the draft differs from the last server-confirmed value.
    pub fn is_dirty(&self) -> bool {
        self.draft != self.snapshot
    }
}
