//! Typed value boxes.
//!
//! A flag is stored in the [`FlagSet`](crate::FlagSet) as a type-erased
//! `Box<dyn Value>`, but before it is erased the caller receives a
//! [`Handle<T>`] to the very same storage. Later sources write through the
//! box and the caller observes the result through the handle.
//!
//! Two boxes cover every stock type:
//!
//! - [`Var<T>`] holds one `T` and a setter that parses a string into it.
//! - [`List<T>`] holds a `Vec<T>`. Each occurrence of the flag appends, except
//!   that the first one discards the defaults.
//!
//! Neither box guesses whether its flag is boolean-like from `T`; call
//! `bool_flag()` on the box to let the flag appear bare on the command line.
//!
//! Anything else (counters, bit sets, enums with custom syntax) can implement
//! [`Getter`] directly.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::error::BoxError;

/// Parses a string into `T`.
pub type ValParser<T> = Box<dyn Fn(&str) -> Result<T, BoxError>>;

/// Parses a string and assigns the result into `*T`.
pub type ValSetter<T> = Box<dyn FnMut(&mut T, &str) -> Result<(), BoxError>>;

type Renderer<T> = Box<dyn Fn(&T) -> String>;

/// Shared view of a flag's storage.
///
/// Cloning a handle is cheap and every clone sees the same value. Handles are
/// `!Send`: resolve flags on one thread, then copy the values out.
#[derive(Debug, Default)]
pub struct Handle<T>(Rc<RefCell<T>>);

impl<T> Handle<T> {
    pub fn new(value: T) -> Self {
        Handle(Rc::new(RefCell::new(value)))
    }

    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    /// Mutable access for [`Getter`] implementations.
    ///
    /// # Panics
    ///
    /// Panics if a [`borrow`](Self::borrow) of the same handle is still alive.
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.0.borrow())
    }
}

impl<T: Clone> Handle<T> {
    /// A copy of the current value.
    pub fn get(&self) -> T {
        self.0.borrow().clone()
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Handle(Rc::clone(&self.0))
    }
}

/// The type-erased capability every flag value provides.
pub trait Value {
    /// Parse `raw` and store it.
    fn set(&mut self, raw: &str) -> Result<(), BoxError>;

    /// String form of the current value, used for usage text and reports.
    fn render(&self) -> String;

    /// Whether the flag may appear on the command line without a value
    /// (`-verbose` meaning `-verbose=true`).
    fn is_bool_flag(&self) -> bool {
        false
    }
}

/// A [`Value`] that can hand out a typed [`Handle`] to its storage.
///
/// `Target` need not be `Self`: a counter box may track whether it was reset
/// while the caller only cares about the `i64` it counts.
pub trait Getter: Value {
    type Target;

    fn handle(&self) -> Handle<Self::Target>;
}

/// A single value of type `T`.
pub struct Var<T> {
    value: Handle<T>,
    setter: ValSetter<T>,
    render: Renderer<T>,
    bool_flag: bool,
}

impl<T: fmt::Display + 'static> Var<T> {
    /// Box `default`, rendering it with `Display`.
    pub fn new<S>(default: T, setter: S) -> Self
    where
        S: FnMut(&mut T, &str) -> Result<(), BoxError> + 'static,
    {
        Self::with_renderer(default, setter, |v: &T| v.to_string())
    }

    /// Box the value obtained by running `setter` over `default`.
    ///
    /// # Panics
    ///
    /// Panics if `default` does not parse. Defaults come from the program, not
    /// the user, so a bad one is a bug.
    pub fn from_str_default<S>(default: &str, setter: S) -> Self
    where
        T: Default,
        S: FnMut(&mut T, &str) -> Result<(), BoxError> + 'static,
    {
        Self::from_str_default_with_renderer(default, setter, |v: &T| v.to_string())
    }
}

impl<T: 'static> Var<T> {
    pub fn with_renderer<S, R>(default: T, setter: S, render: R) -> Self
    where
        S: FnMut(&mut T, &str) -> Result<(), BoxError> + 'static,
        R: Fn(&T) -> String + 'static,
    {
        Var {
            value: Handle::new(default),
            setter: Box::new(setter),
            render: Box::new(render),
            bool_flag: false,
        }
    }

    /// Let the flag be given without a value; a bare `-name` sets `"true"`.
    pub fn bool_flag(mut self) -> Self {
        self.bool_flag = true;
        self
    }

    /// # Panics
    ///
    /// Panics if `default` does not parse.
    pub fn from_str_default_with_renderer<S, R>(default: &str, mut setter: S, render: R) -> Self
    where
        T: Default,
        S: FnMut(&mut T, &str) -> Result<(), BoxError> + 'static,
        R: Fn(&T) -> String + 'static,
    {
        let mut value = T::default();
        if let Err(e) = setter(&mut value, default) {
            panic!("flag: invalid default value {default:?}: {e}");
        }
        Self::with_renderer(value, setter, render)
    }
}

impl<T: 'static> Value for Var<T> {
    fn set(&mut self, raw: &str) -> Result<(), BoxError> {
        let mut value = self.value.borrow_mut();
        (self.setter)(&mut *value, raw)
    }

    fn render(&self) -> String {
        (self.render)(&*self.value.borrow())
    }

    fn is_bool_flag(&self) -> bool {
        self.bool_flag
    }
}

impl<T: 'static> Getter for Var<T> {
    type Target = T;

    fn handle(&self) -> Handle<T> {
        self.value.clone()
    }
}

/// A repeatable flag accumulating into a `Vec<T>`.
pub struct List<T> {
    value: Handle<Vec<T>>,
    parse: ValParser<T>,
    render: Renderer<T>,
    written: bool,
    bool_flag: bool,
}

impl<T: fmt::Display + 'static> List<T> {
    /// Copies `defaults`, so later changes to the caller's slice never reach
    /// the flag and the flag never writes into the caller's slice.
    pub fn new<P>(defaults: &[T], parse: P) -> Self
    where
        T: Clone,
        P: Fn(&str) -> Result<T, BoxError> + 'static,
    {
        Self::with_renderer(defaults, parse, |v: &T| v.to_string())
    }

    /// # Panics
    ///
    /// Panics on the first default that does not parse.
    pub fn from_str_defaults<S, P>(defaults: &[S], parse: P) -> Self
    where
        S: AsRef<str>,
        P: Fn(&str) -> Result<T, BoxError> + 'static,
    {
        Self::from_str_defaults_with_renderer(defaults, parse, |v: &T| v.to_string())
    }
}

impl<T: 'static> List<T> {
    pub fn with_renderer<P, R>(defaults: &[T], parse: P, render: R) -> Self
    where
        T: Clone,
        P: Fn(&str) -> Result<T, BoxError> + 'static,
        R: Fn(&T) -> String + 'static,
    {
        Self::from_vec(defaults.to_vec(), parse, render)
    }

    /// # Panics
    ///
    /// Panics on the first default that does not parse.
    pub fn from_str_defaults_with_renderer<S, P, R>(defaults: &[S], parse: P, render: R) -> Self
    where
        S: AsRef<str>,
        P: Fn(&str) -> Result<T, BoxError> + 'static,
        R: Fn(&T) -> String + 'static,
    {
        let mut values = Vec::with_capacity(defaults.len());
        for default in defaults {
            let default = default.as_ref();
            match parse(default) {
                Ok(v) => values.push(v),
                Err(e) => panic!("flag: invalid default value {default:?}: {e}"),
            }
        }
        Self::from_vec(values, parse, render)
    }

    fn from_vec<P, R>(values: Vec<T>, parse: P, render: R) -> Self
    where
        P: Fn(&str) -> Result<T, BoxError> + 'static,
        R: Fn(&T) -> String + 'static,
    {
        List {
            value: Handle::new(values),
            parse: Box::new(parse),
            render: Box::new(render),
            written: false,
            bool_flag: false,
        }
    }

    /// Let each occurrence be given without a value, appending `"true"`.
    pub fn bool_flag(mut self) -> Self {
        self.bool_flag = true;
        self
    }
}

impl<T: 'static> Value for List<T> {
    fn set(&mut self, raw: &str) -> Result<(), BoxError> {
        if !self.written {
            self.value.borrow_mut().clear();
            self.written = true;
        }
        let v = (self.parse)(raw)?;
        self.value.borrow_mut().push(v);
        Ok(())
    }

    fn render(&self) -> String {
        let values = self.value.borrow();
        let parts: Vec<String> = values.iter().map(|v| (self.render)(v)).collect();
        format!("[{}]", parts.join(", "))
    }

    fn is_bool_flag(&self) -> bool {
        self.bool_flag
    }
}

impl<T: 'static> Getter for List<T> {
    type Target = Vec<T>;

    fn handle(&self) -> Handle<Vec<T>> {
        self.value.clone()
    }
}

/// Turn a parser into a setter that assigns only on success.
pub fn setter_from<T, P>(parse: P) -> impl FnMut(&mut T, &str) -> Result<(), BoxError>
where
    P: Fn(&str) -> Result<T, BoxError>,
{
    move |slot: &mut T, raw: &str| {
        *slot = parse(raw)?;
        Ok(())
    }
}
