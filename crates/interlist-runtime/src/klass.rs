//! Classes, methods and method resolution.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use derive_more::Display;
use interlist_dispatch::Signature;

use crate::exception::HostException;
use crate::object::HostObject;
use crate::value::Value;

/// Identity of a class. Distinct classes never share an id, even when they
/// have the same name and methods.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("#{_0}")]
pub struct KlassId(pub(crate) u32);

impl KlassId {
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Compiled body of a method: receiver plus already-marshalled arguments.
pub type CallTarget =
    Arc<dyn Fn(&HostObject, &[Value]) -> Result<Value, HostException> + Send + Sync>;

pub struct Method {
    name: String,
    signature: Signature,
    target: CallTarget,
}

pub type MethodRef = Arc<Method>;

impl Method {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> Signature {
        self.signature
    }

    pub fn call(&self, receiver: &HostObject, args: &[Value]) -> Result<Value, HostException> {
        (self.target)(receiver, args)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Method({}{})", self.name, self.signature)
    }
}

pub struct Klass {
    id: KlassId,
    name: String,
    methods: HashMap<(String, Signature), MethodRef>,
}

pub type KlassRef = Arc<Klass>;

impl Klass {
    pub fn id(&self) -> KlassId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Find a method by exact name and signature.
    pub fn lookup_method(&self, name: &str, signature: Signature) -> Option<MethodRef> {
        self.methods.get(&(name.to_string(), signature)).cloned()
    }

    /// Declared methods, sorted by name.
    pub fn methods(&self) -> Vec<MethodRef> {
        let mut methods: Vec<_> = self.methods.values().cloned().collect();
        methods.sort_by(|a, b| a.name.cmp(&b.name));
        methods
    }
}

impl fmt::Debug for Klass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.id)
    }
}

/// Collects a class's methods before the registry assigns its identity.
pub struct KlassBuilder {
    name: String,
    methods: HashMap<(String, Signature), MethodRef>,
}

impl KlassBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method<F>(mut self, name: &str, signature: Signature, body: F) -> Self
    where
        F: Fn(&HostObject, &[Value]) -> Result<Value, HostException> + Send + Sync + 'static,
    {
        let method = Method {
            name: name.to_string(),
            signature,
            target: Arc::new(body),
        };
        self.methods
            .insert((name.to_string(), signature), Arc::new(method));
        self
    }

    pub(crate) fn build(self, id: KlassId) -> Klass {
        Klass {
            id,
            name: self.name,
            methods: self.methods,
        }
    }
}
