use std::cell::Cell;

/// Wraps a value with change tracking based on [`PartialEq`].
///
/// [`Self::changed`] returns `true` if and only if the current value is actually different from the
/// last [acknowledged](Self::acknowledge) one. Setting a value back to the acknowledged one clears
/// the flag again.
///
/// Uses interior mutability, since tracked values usually belong to scene objects that are shared
/// with a spatial index while they move:
///
/// ```
/// # use culltree_lib::change_tracking::Tracked;
/// let position = Tracked::new(0);
/// position.set(42);
/// assert!(position.changed());
/// position.set(0);
/// assert!(!position.changed());
/// ```
///
/// One caveat applies: If the acknowledged value was not equal to itself (such as [`f32::NAN`]),
/// only [`Self::acknowledge`] or [`Self::reset`] will be able to clear the "changed" flag, since
/// [`Self::set`] will (rightfully) consider even the "same" value as different.
#[derive(Debug, Default)]
pub struct Tracked<T: Copy> {
    /// The current value.
    value: Cell<T>,
    /// Stores the acknowledged value if, and only if, the value was changed since.
    original_value: Cell<Option<T>>,
}

impl<T: Copy> Tracked<T> {
    /// Constructs a new unchanged [`Tracked`] value.
    pub fn new(value: T) -> Self {
        Self {
            value: Cell::new(value),
            original_value: Cell::new(None),
        }
    }

    pub fn get(&self) -> T {
        self.value.get()
    }

    /// Updates the value while keeping track of changes.
    pub fn set(&self, value: T)
    where
        T: PartialEq,
    {
        if let Some(original_value) = self.original_value.get() {
            if value == original_value {
                self.original_value.set(None);
            }
        } else if value != self.value.get() {
            self.original_value.set(Some(self.value.get()));
        }
        self.value.set(value);
    }

    /// Whether the current value differs from the acknowledged one.
    pub fn changed(&self) -> bool {
        self.original_value.get().is_some()
    }

    /// Accepts the current value as the new baseline, clearing the "changed" flag.
    pub fn acknowledge(&self) {
        self.original_value.set(None);
    }

    /// Reverts to the acknowledged value.
    pub fn reset(&self) {
        if let Some(original_value) = self.original_value.take() {
            self.value.set(original_value);
        }
    }
}
