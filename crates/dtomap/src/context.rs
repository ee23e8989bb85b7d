use by_address::ByAddress;

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Identity map for one top-level reverse conversion: DTO instance identity
/// to the domain instance being reconstructed from it.
type Frame = HashMap<ByAddress<Rc<dyn Any>>, Rc<dyn Any>>;

thread_local! {
    static FRAMES: RefCell<Vec<Frame>> = RefCell::new(Vec::new());
}

/// Call-scoped identity maps used by generated reverse-conversion code to
/// break cycles in DTO graphs.
///
/// Every externally invoked reverse conversion enters a scope; nested
/// reverse conversions triggered while populating properties reuse the
/// topmost map. A frame holds strong references to every DTO key and domain
/// instance registered in it, so everything a conversion allocates stays
/// alive until the owning scope is released.
///
/// Frames live on a thread-local stack: concurrent top-level conversions
/// run on distinct threads (the converted graphs are `Rc`-based and
/// `!Send`) and never share a frame.
pub struct IdentityContext;

impl IdentityContext {
    /// Enters a reverse-conversion scope, reusing the current frame if one
    /// is already active on this thread.
    ///
    /// The returned guard releases the frame when dropped, on every exit
    /// path including panics and `?` returns.
    pub fn enter() -> ContextScope {
        let owner = FRAMES.with(|frames| {
            let mut frames = frames.borrow_mut();
            if frames.is_empty() {
                frames.push(Frame::new());
                true
            } else {
                false
            }
        });

        ContextScope { owner }
    }
}

/// Guard for one entered reverse-conversion scope.
pub struct ContextScope {
    /// True when this scope pushed the frame and is responsible for
    /// popping it.
    owner: bool,
}

impl ContextScope {
    /// Returns the in-progress domain instance registered for `dto`, if
    /// any. The instance may still be under construction; returning it
    /// as-is is what breaks cycles.
    pub fn get<T, D>(&self, dto: &Rc<RefCell<T>>) -> Option<Rc<RefCell<D>>>
    where
        T: 'static,
        D: 'static,
    {
        let key = ByAddress(dto.clone() as Rc<dyn Any>);

        FRAMES
            .with(|frames| frames.borrow().last().and_then(|frame| frame.get(&key).cloned()))
            .and_then(|found| found.downcast::<RefCell<D>>().ok())
    }

    /// Registers `domain` as the instance reconstructed from `dto`.
    ///
    /// Generated code must call this before populating any field of
    /// `domain`; registering after populating reintroduces infinite
    /// recursion on cyclic graphs.
    pub fn store<T, D>(&self, dto: &Rc<RefCell<T>>, domain: &Rc<RefCell<D>>)
    where
        T: 'static,
        D: 'static,
    {
        let key = ByAddress(dto.clone() as Rc<dyn Any>);
        let value = domain.clone() as Rc<dyn Any>;

        FRAMES.with(|frames| {
            let mut frames = frames.borrow_mut();
            let frame = frames.last_mut().expect("identity context released while in scope");
            frame.insert(key, value);
        });
    }
}

impl Drop for ContextScope {
    fn drop(&mut self) {
        if self.owner {
            FRAMES.with(|frames| {
                frames.borrow_mut().pop();
            });
        }
    }
}
