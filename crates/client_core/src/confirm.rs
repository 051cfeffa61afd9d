/// Confirm/cancel gate in front of a destructive call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConfirmation<Id> {
    pending: Option<Id>,
}

impl<Id> Default for DeleteConfirmation<Id> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<Id: Copy> DeleteConfirmation<Id> {
    /// Opens the prompt for `id`, replacing any earlier target.
    pub fn request(&mut self, id: Id) {
        self.pending = Some(id);
    }

    pub fn pending(&self) -> Option<Id> {
        self.pending
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    /// Yields the target exactly once.
    pub fn confirm(&mut self) -> Option<Id> {
        self.pending.take()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn close(&mut self) {
        self.cancel();
    }
}
