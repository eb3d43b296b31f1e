//! Errors raised by the runtime's own API (not by host code).

use derive_more::Display;

use crate::klass::KlassId;

pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum RuntimeError {
    #[display("Unknown class: {_0}")]
    UnknownClass(String),

    #[display("Class {name} ({id}) is not list-shaped")]
    NotAList { name: String, id: KlassId },
}

impl std::error::Error for RuntimeError {}
