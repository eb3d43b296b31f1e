//! The boundary between the adapter and the host object model.
//!
//! Everything the adapter needs from the host language is expressed through
//! [`HostRuntime`]: classifying a receiver, resolving a named operation on a
//! concrete type, invoking the resolved handle and marshalling a handful of
//! values. The adapter never looks inside any of the associated types.

use std::fmt;

use derive_more::Display;

/// Parameter and return kinds used to describe list operation signatures.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum ParamKind {
    #[display("int")]
    Int,
    #[display("any")]
    Any,
}

/// A host-neutral method signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    pub params: &'static [ParamKind],
    pub returns: ParamKind,
}

impl Signature {
    pub const fn new(params: &'static [ParamKind], returns: ParamKind) -> Self {
        Self { params, returns }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{param}")?;
        }
        write!(f, "){}", self.returns)
    }
}

/// The three list operations the adapter dispatches.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum Operation {
    #[display("size")]
    Size,
    #[display("get")]
    Get,
    #[display("set")]
    Set,
}

impl Operation {
    pub const SIZE_SIGNATURE: Signature = Signature::new(&[], ParamKind::Int);
    pub const GET_SIGNATURE: Signature = Signature::new(&[ParamKind::Int], ParamKind::Any);
    pub const SET_SIGNATURE: Signature =
        Signature::new(&[ParamKind::Int, ParamKind::Any], ParamKind::Any);

    /// Host method name.
    pub fn name(self) -> &'static str {
        match self {
            Operation::Size => "size",
            Operation::Get => "get",
            Operation::Set => "set",
        }
    }

    pub fn signature(self) -> Signature {
        match self {
            Operation::Size => Self::SIZE_SIGNATURE,
            Operation::Get => Self::GET_SIGNATURE,
            Operation::Set => Self::SET_SIGNATURE,
        }
    }
}

/// Failure of a single invocation of a resolved method handle.
///
/// `Host` carries an exception raised by the host code itself. The other
/// variants come from the argument marshalling step that runs before the
/// host code is entered.
#[derive(Clone, Debug, Display, PartialEq)]
pub enum InvokeError<E> {
    #[display("host exception: {_0:?}")]
    Host(E),
    #[display("arity mismatch: expected {expected} arguments, got {actual}")]
    Arity { expected: usize, actual: usize },
    #[display("unsupported argument type at position {position}")]
    UnsupportedType { position: usize },
}

/// Collaborators supplied by the host language.
///
/// `Klass` is the identity used as a dispatch cache key. Two receivers with
/// equal `Klass` values must resolve the same method for the same
/// [`Operation`] for the whole lifetime of the process.
pub trait HostRuntime {
    type Object: ?Sized;
    type Klass: Clone + PartialEq + fmt::Debug;
    type Method: Clone + fmt::Debug;
    type Value: Clone + fmt::Debug;
    type Exception: fmt::Debug;

    fn klass_of(&self, receiver: &Self::Object) -> Self::Klass;

    /// Resolve `op` on `klass`. `None` means the type is not list-shaped.
    fn lookup_method(&self, klass: &Self::Klass, op: Operation) -> Option<Self::Method>;

    /// Direct invocation of a handle that has been cached at a call site.
    fn invoke_cached(
        &self,
        method: &Self::Method,
        receiver: &Self::Object,
        args: &[Self::Value],
    ) -> Result<Self::Value, InvokeError<Self::Exception>>;

    /// Indirect invocation used before a handle is cached and in uncached mode.
    fn invoke_dynamic(
        &self,
        method: &Self::Method,
        receiver: &Self::Object,
        args: &[Self::Value],
    ) -> Result<Self::Value, InvokeError<Self::Exception>>;

    /// Instance-of check against the host's index-out-of-bounds exception class.
    fn is_index_out_of_bounds(&self, exception: &Self::Exception) -> bool;

    fn wrap_index(&self, index: i32) -> Self::Value;

    /// Read the element count returned by a `size` call.
    fn count_of(&self, value: &Self::Value) -> Option<i64>;

    /// Normalize a value read out of host storage for a foreign caller.
    fn unwrap_foreign(&self, value: Self::Value) -> Self::Value;
}

/// Resolve `op` for `klass`, treating a missing method as an internal error.
pub(crate) fn lookup_or_ice<H: HostRuntime + ?Sized>(
    host: &H,
    klass: &H::Klass,
    op: Operation,
) -> H::Method {
    host.lookup_method(klass, op).unwrap_or_else(|| {
        panic!(
            "ICE: {klass:?} has no `{}{}` method; receiver is not a list",
            op.name(),
            op.signature()
        )
    })
}

/// Unwrap an invocation result, keeping only host exceptions as errors.
///
/// Marshalling failures are impossible for a correctly resolved handle:
/// the adapter always passes exactly the arguments of the signature it
/// looked up.
pub(crate) fn host_result<V, E: fmt::Debug>(
    op: Operation,
    result: Result<V, InvokeError<E>>,
) -> Result<V, E> {
    match result {
        Ok(value) => Ok(value),
        Err(InvokeError::Host(exception)) => Err(exception),
        Err(marshalling) => panic!(
            "ICE: `{}{}` rejected adapter-supplied arguments: {marshalling}",
            op.name(),
            op.signature()
        ),
    }
}
