//! The world threaded through one run.

use cukeglue_host::StepError;

/// Holder of the user-defined world value.
///
/// Starts absent. Every step and hook receives a copy of the current value
/// and returns the replacement; the replacement is stored only when the
/// function succeeds.
///
/// # Examples
/// ```
/// use cukeglue::World;
///
/// let mut world: World<u32> = World::new();
/// world
///     .apply(|current| Ok(Some(current.unwrap_or_default() + 1)))
///     .expect("apply succeeds");
/// assert_eq!(world.get(), Some(&1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct World<W> {
    value: Option<W>,
}

impl<W> Default for World<W> {
    fn default() -> Self {
        Self { value: None }
    }
}

impl<W: Clone> World<W> {
    /// An absent world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A world already holding `value`.
    #[must_use]
    pub const fn with_value(value: W) -> Self {
        Self { value: Some(value) }
    }

    /// Current value.
    #[must_use]
    pub const fn get(&self) -> Option<&W> {
        self.value.as_ref()
    }

    /// Whether no value has been stored yet, or the last function returned
    /// none.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        self.value.is_none()
    }

    /// Run `f` on a copy of the current value and keep what it returns.
    ///
    /// # Errors
    /// Returns the error from `f`; the current value is left untouched.
    pub fn apply<F>(&mut self, f: F) -> Result<(), StepError>
    where
        F: FnOnce(Option<W>) -> Result<Option<W>, StepError>,
    {
        self.value = f(self.value.clone())?;
        Ok(())
    }

    /// Take the current value out.
    #[must_use]
    pub fn into_inner(self) -> Option<W> {
        self.value
    }
}
