use std::cell::RefCell;
use std::rc::Rc;

/// Handle returned by `subscribe`, used to detach the listener again
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

type Listener<T> = Rc<dyn Fn(&T)>;

struct Inner<T> {
    value: T,
    version: u64,
    listeners: Vec<(ListenerId, Listener<T>)>,
    next_listener: u64,
}

/// Single owned value shared by every panel of one dashboard view.
/// Cloning the store clones the handle, never the value.
pub struct Store<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone> Store<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value,
                version: 0,
                listeners: Vec::new(),
                next_listener: 0,
            })),
        }
    }

    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Read without cloning
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Incremented on every committed change
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Mutate in place. `f` returns whether it changed anything; listeners run only if so.
    pub fn update(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            let changed = f(&mut inner.value);
            if changed {
                inner.version += 1;
            }
            changed
        };
        if changed {
            self.notify();
        }
        changed
    }

    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        let id = ListenerId(inner.next_listener);
        inner.next_listener += 1;
        inner.listeners.push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) {
        self.inner.borrow_mut().listeners.retain(|(lid, _)| *lid != id);
    }

    fn notify(&self) {
        // Release the borrow first so listeners may read the store
        let (value, listeners) = {
            let inner = self.inner.borrow();
            let listeners: Vec<Listener<T>> =
                inner.listeners.iter().map(|(_, l)| Rc::clone(l)).collect();
            (inner.value.clone(), listeners)
        };
        for listener in listeners {
            listener(&value);
        }
    }
}
