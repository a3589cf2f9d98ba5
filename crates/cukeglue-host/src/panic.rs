//! Catching panics raised by glue functions.
//!
//! The runner wraps every unit invocation in [`catch_panic`]. A process-wide
//! panic hook records the panic location for the current thread while a
//! guarded call is in progress and stays silent; panics outside a guarded
//! call are forwarded to the previously installed hook.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;

use crate::definition::StackFrame;

thread_local! {
    static GUARDED: Cell<bool> = const { Cell::new(false) };
    static LAST_FRAME: RefCell<Option<StackFrame>> = const { RefCell::new(None) };
}

static HOOK: OnceLock<()> = OnceLock::new();

fn install_hook() {
    HOOK.get_or_init(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if GUARDED.with(Cell::get) {
                let frame = info
                    .location()
                    .map(|location| StackFrame::new(location.file(), location.line()));
                LAST_FRAME.with(|slot| *slot.borrow_mut() = frame);
            } else {
                previous(info);
            }
        }));
    });
}

/// A panic caught while running glue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaughtPanic {
    /// Panic payload rendered as text.
    pub message: String,
    /// Where `panic!` was invoked, when known.
    pub frame: Option<StackFrame>,
}

/// Format a panic payload as text.
///
/// # Examples
/// ```
/// use cukeglue_host::panic_message;
/// use std::any::Any;
///
/// let payload: Box<dyn Any + Send> = Box::new(String::from("boom"));
/// assert_eq!(panic_message(payload.as_ref()), "boom");
/// ```
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    macro_rules! try_downcast {
        ($($ty:ty),* $(,)?) => {
            $(
                if let Some(value) = payload.downcast_ref::<$ty>() {
                    return value.to_string();
                }
            )*
        };
    }

    try_downcast!(&str, String, i32, u32, i64, u64, isize, usize, f32, f64);
    "panic with a non-text payload".to_string()
}

/// Run `f`, converting a panic into [`CaughtPanic`].
///
/// # Errors
/// Returns the caught panic's message and location.
pub fn catch_panic<T>(f: impl FnOnce() -> T) -> Result<T, CaughtPanic> {
    install_hook();
    let was_guarded = GUARDED.with(|guarded| guarded.replace(true));
    LAST_FRAME.with(|slot| slot.borrow_mut().take());
    let outcome = panic::catch_unwind(AssertUnwindSafe(f));
    GUARDED.with(|guarded| guarded.set(was_guarded));
    outcome.map_err(|payload| CaughtPanic {
        message: panic_message(payload.as_ref()),
        frame: LAST_FRAME.with(|slot| slot.borrow_mut().take()),
    })
}
