//! The host VM: method resolution, invocation and value marshalling.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use interlist_dispatch::{HostRuntime, InvokeError, Operation, ParamKind};
use tracing::trace;

use crate::error::{RuntimeError, RuntimeResult};
use crate::exception::{ExceptionKind, HostException};
use crate::klass::{KlassId, KlassRef, MethodRef};
use crate::lists::{STANDARD_LISTS, define_standard_lists};
use crate::object::{HostObject, ObjectRef};
use crate::registry::ClassRegistry;
use crate::value::Value;

/// Counters of the work the VM has done on behalf of callers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VmStats {
    pub lookups: u64,
    pub cached_invocations: u64,
    pub dynamic_invocations: u64,
}

#[derive(Default)]
struct VmCounters {
    lookups: AtomicU64,
    cached_invocations: AtomicU64,
    dynamic_invocations: AtomicU64,
}

pub struct HostVm {
    registry: ClassRegistry,
    counters: VmCounters,
}

impl HostVm {
    pub fn new() -> Self {
        Self {
            registry: ClassRegistry::new(),
            counters: VmCounters::default(),
        }
    }

    /// A VM with one class of each standard list kind.
    pub fn with_standard_lists() -> Self {
        let vm = Self::new();
        define_standard_lists(&vm.registry);
        vm
    }

    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    /// Instantiate the class registered under `class_name` with `items`.
    pub fn new_list(&self, class_name: &str, items: Vec<Value>) -> RuntimeResult<ObjectRef> {
        let klass = self
            .registry
            .by_name(class_name)
            .ok_or_else(|| RuntimeError::UnknownClass(class_name.to_string()))?;
        self.instantiate(&klass, items)
    }

    /// Instantiate `klass`, which must declare all list operations.
    pub fn instantiate(&self, klass: &KlassRef, items: Vec<Value>) -> RuntimeResult<ObjectRef> {
        let is_list = [Operation::Size, Operation::Get, Operation::Set]
            .into_iter()
            .all(|op| klass.lookup_method(op.name(), op.signature()).is_some());
        if !is_list {
            return Err(RuntimeError::NotAList {
                name: klass.name().to_string(),
                id: klass.id(),
            });
        }
        Ok(Arc::new(HostObject::new(Arc::clone(klass), items)))
    }

    /// Instantiate without checking the class shape.
    pub fn instantiate_unchecked(&self, klass: &KlassRef, slots: Vec<Value>) -> ObjectRef {
        Arc::new(HostObject::new(Arc::clone(klass), slots))
    }

    pub fn standard_list_names(&self) -> &'static [&'static str] {
        &STANDARD_LISTS
    }

    pub fn stats(&self) -> VmStats {
        VmStats {
            lookups: self.counters.lookups.load(Ordering::Relaxed),
            cached_invocations: self.counters.cached_invocations.load(Ordering::Relaxed),
            dynamic_invocations: self.counters.dynamic_invocations.load(Ordering::Relaxed),
        }
    }

    /// Check `args` against the method signature, then run the method body.
    fn invoke(
        &self,
        method: &MethodRef,
        receiver: &HostObject,
        args: &[Value],
    ) -> Result<Value, InvokeError<HostException>> {
        let signature = method.signature();
        if args.len() != signature.arity() {
            return Err(InvokeError::Arity {
                expected: signature.arity(),
                actual: args.len(),
            });
        }
        for (position, (param, arg)) in signature.params.iter().zip(args).enumerate() {
            if *param == ParamKind::Int && !matches!(arg, Value::Int(_)) {
                return Err(InvokeError::UnsupportedType { position });
            }
        }
        method.call(receiver, args).map_err(InvokeError::Host)
    }
}

impl Default for HostVm {
    fn default() -> Self {
        Self::new()
    }
}

impl HostRuntime for HostVm {
    type Object = HostObject;
    type Klass = KlassId;
    type Method = MethodRef;
    type Value = Value;
    type Exception = HostException;

    fn klass_of(&self, receiver: &HostObject) -> KlassId {
        receiver.klass().id()
    }

    fn lookup_method(&self, klass: &KlassId, op: Operation) -> Option<MethodRef> {
        self.counters.lookups.fetch_add(1, Ordering::Relaxed);
        trace!(%klass, %op, "method lookup");
        self.registry
            .get(*klass)?
            .lookup_method(op.name(), op.signature())
    }

    fn invoke_cached(
        &self,
        method: &MethodRef,
        receiver: &HostObject,
        args: &[Value],
    ) -> Result<Value, InvokeError<HostException>> {
        self.counters
            .cached_invocations
            .fetch_add(1, Ordering::Relaxed);
        self.invoke(method, receiver, args)
    }

    fn invoke_dynamic(
        &self,
        method: &MethodRef,
        receiver: &HostObject,
        args: &[Value],
    ) -> Result<Value, InvokeError<HostException>> {
        self.counters
            .dynamic_invocations
            .fetch_add(1, Ordering::Relaxed);
        self.invoke(method, receiver, args)
    }

    fn is_index_out_of_bounds(&self, exception: &HostException) -> bool {
        exception.instance_of(ExceptionKind::IndexOutOfBounds)
    }

    fn wrap_index(&self, index: i32) -> Value {
        Value::Int(index)
    }

    fn count_of(&self, value: &Value) -> Option<i64> {
        value.as_integer()
    }

    fn unwrap_foreign(&self, value: Value) -> Value {
        value.unwrap_foreign()
    }
}
