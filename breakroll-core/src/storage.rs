//! Persistence slot abstraction.
use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

/// A single named string slot holding the latest snapshot.
/// Platform-specific implementations should provide this
pub trait StateSlot {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the stored payload, `None` when nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn read(&self) -> Result<Option<String>, Self::Error>;

    /// Replace the stored payload. Readers must never observe a partial write.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be stored.
    fn write(&self, payload: &str) -> Result<(), Self::Error>;
}

impl<S: StateSlot + ?Sized> StateSlot for &S {
    type Error = S::Error;

    fn read(&self) -> Result<Option<String>, Self::Error> {
        (**self).read()
    }

    fn write(&self, payload: &str) -> Result<(), Self::Error> {
        (**self).write(payload)
    }
}

/// In-memory slot; clones share the same payload.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    payload: Rc<RefCell<Option<String>>>,
}

impl MemorySlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: Rc::new(RefCell::new(Some(payload.into()))),
        }
    }

    #[must_use]
    pub fn payload(&self) -> Option<String> {
        self.payload.borrow().clone()
    }
}

impl StateSlot for MemorySlot {
    type Error = Infallible;

    fn read(&self) -> Result<Option<String>, Self::Error> {
        Ok(self.payload.borrow().clone())
    }

    fn write(&self, payload: &str) -> Result<(), Self::Error> {
        *self.payload.borrow_mut() = Some(payload.to_string());
        Ok(())
    }
}
