//! Shared ownership of life forms.
//!
//! The spatial index, the roster and every pending task that will act on a
//! life form hold a [`LifeFormRef`]. The life form is reclaimed exactly when
//! the last strong handle goes away, which the kernel arranges to happen only
//! after it is dead and out of the index.

use crate::lifeform::LifeForm;
use crate::species::Species;
use std::cell::{Ref, RefMut};
use std::fmt;
use std::ops::Deref;
use std::rc::{Rc, Weak};

#[derive(Clone)]
pub struct LifeFormRef(Rc<LifeForm>);

impl LifeFormRef {
    pub(crate) fn new(life: LifeForm) -> Self {
        Self(Rc::new(life))
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &LifeFormRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    #[must_use]
    pub fn downgrade(&self) -> WeakLifeForm {
        WeakLifeForm(Rc::downgrade(&self.0))
    }

    /// Number of strong handles currently keeping this life form alive.
    #[must_use]
    pub fn holders(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// Narrows to the concrete species behind this handle.
    ///
    /// Returns `None` for a different species. Must not be called while the
    /// species is already mutably borrowed (i.e. from inside its own hooks).
    #[must_use]
    pub fn species<S: Species>(&self) -> Option<Ref<'_, S>> {
        Ref::filter_map(self.0.species.borrow(), |s| (**s).as_any().downcast_ref::<S>()).ok()
    }

    /// Mutable counterpart of [`LifeFormRef::species`].
    #[must_use]
    pub fn species_mut<S: Species>(&self) -> Option<RefMut<'_, S>> {
        RefMut::filter_map(self.0.species.borrow_mut(), |s| {
            (**s).as_any_mut().downcast_mut::<S>()
        })
        .ok()
    }

    /// True when the species behind this handle is `S`.
    #[must_use]
    pub fn is<S: Species>(&self) -> bool {
        self.0
            .species
            .try_borrow()
            .map(|s| (**s).as_any().is::<S>())
            .unwrap_or(false)
    }
}

impl Deref for LifeFormRef {
    type Target = LifeForm;

    fn deref(&self) -> &LifeForm {
        &self.0
    }
}

impl fmt::Debug for LifeFormRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifeFormRef")
            .field("id", &self.id())
            .field("species", &self.species_name())
            .field("state", &self.state())
            .finish()
    }
}

/// Non-owning handle; used by the roster so it never keeps anything alive.
#[derive(Clone)]
pub struct WeakLifeForm(Weak<LifeForm>);

impl WeakLifeForm {
    #[must_use]
    pub fn upgrade(&self) -> Option<LifeFormRef> {
        self.0.upgrade().map(LifeFormRef)
    }

    #[must_use]
    pub fn is_released(&self) -> bool {
        self.0.strong_count() == 0
    }
}
