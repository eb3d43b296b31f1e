//! Minimal host used by the unit tests of this crate.

use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::host::{HostRuntime, InvokeError, Operation};

const NOT_A_LIST: u32 = u32::MAX;

#[derive(Clone, Debug, PartialEq)]
pub enum TestValue {
    Int(i64),
    Foreign(Box<TestValue>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum TestException {
    OutOfBounds(i64),
    Fault(&'static str),
}

#[derive(Clone, Debug)]
pub struct TestMethod {
    pub op: Operation,
    pub klass: u32,
}

pub struct TestList {
    klass: u32,
    items: RwLock<Vec<TestValue>>,
    reported_size: Option<i64>,
    failing: Option<Operation>,
    rejects_set_arguments: bool,
}

impl TestList {
    pub fn new(klass: u32, items: Vec<i64>) -> Self {
        Self::from_values(klass, items.into_iter().map(TestValue::Int).collect())
    }

    pub fn from_values(klass: u32, items: Vec<TestValue>) -> Self {
        Self {
            klass,
            items: RwLock::new(items),
            reported_size: None,
            failing: None,
            rejects_set_arguments: false,
        }
    }

    pub fn not_a_list() -> Self {
        Self::new(NOT_A_LIST, vec![])
    }

    pub fn with_reported_size(mut self, size: i64) -> Self {
        self.reported_size = Some(size);
        self
    }

    pub fn failing_size(mut self) -> Self {
        self.failing = Some(Operation::Size);
        self
    }

    pub fn failing_get(mut self) -> Self {
        self.failing = Some(Operation::Get);
        self
    }

    pub fn failing_set(mut self) -> Self {
        self.failing = Some(Operation::Set);
        self
    }

    pub fn rejecting_set_arguments(mut self) -> Self {
        self.rejects_set_arguments = true;
        self
    }

    pub fn len(&self) -> usize {
        self.items.read().unwrap().len()
    }
}

#[derive(Default)]
pub struct TestHost {
    lookups: AtomicUsize,
    cached_calls: AtomicUsize,
    dynamic_calls: AtomicUsize,
}

impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn cached_calls(&self) -> usize {
        self.cached_calls.load(Ordering::SeqCst)
    }

    pub fn dynamic_calls(&self) -> usize {
        self.dynamic_calls.load(Ordering::SeqCst)
    }

    fn invoke(
        &self,
        method: &TestMethod,
        receiver: &TestList,
        args: &[TestValue],
    ) -> Result<TestValue, InvokeError<TestException>> {
        assert_eq!(method.klass, receiver.klass, "method invoked on foreign klass");
        let expected = method.op.signature().arity();
        if args.len() != expected {
            return Err(InvokeError::Arity {
                expected,
                actual: args.len(),
            });
        }
        if receiver.failing == Some(method.op) {
            return Err(InvokeError::Host(TestException::Fault(method.op.name())));
        }
        let index = match args.first() {
            Some(TestValue::Int(i)) => *i,
            Some(_) => return Err(InvokeError::UnsupportedType { position: 0 }),
            None => 0,
        };
        match method.op {
            Operation::Size => {
                let len = receiver.len() as i64;
                Ok(TestValue::Int(receiver.reported_size.unwrap_or(len)))
            }
            Operation::Get => {
                let items = receiver.items.read().unwrap();
                usize::try_from(index)
                    .ok()
                    .and_then(|i| items.get(i).cloned())
                    .ok_or(InvokeError::Host(TestException::OutOfBounds(index)))
            }
            Operation::Set => {
                if receiver.rejects_set_arguments {
                    return Err(InvokeError::UnsupportedType { position: 1 });
                }
                let mut items = receiver.items.write().unwrap();
                let slot = usize::try_from(index)
                    .ok()
                    .and_then(|i| items.get_mut(i))
                    .ok_or(InvokeError::Host(TestException::OutOfBounds(index)))?;
                Ok(std::mem::replace(slot, args[1].clone()))
            }
        }
    }
}

impl HostRuntime for TestHost {
    type Object = TestList;
    type Klass = u32;
    type Method = TestMethod;
    type Value = TestValue;
    type Exception = TestException;

    fn klass_of(&self, receiver: &TestList) -> u32 {
        receiver.klass
    }

    fn lookup_method(&self, klass: &u32, op: Operation) -> Option<TestMethod> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        (*klass != NOT_A_LIST).then_some(TestMethod { op, klass: *klass })
    }

    fn invoke_cached(
        &self,
        method: &TestMethod,
        receiver: &TestList,
        args: &[TestValue],
    ) -> Result<TestValue, InvokeError<TestException>> {
        self.cached_calls.fetch_add(1, Ordering::SeqCst);
        self.invoke(method, receiver, args)
    }

    fn invoke_dynamic(
        &self,
        method: &TestMethod,
        receiver: &TestList,
        args: &[TestValue],
    ) -> Result<TestValue, InvokeError<TestException>> {
        self.dynamic_calls.fetch_add(1, Ordering::SeqCst);
        self.invoke(method, receiver, args)
    }

    fn is_index_out_of_bounds(&self, exception: &TestException) -> bool {
        matches!(exception, TestException::OutOfBounds(_))
    }

    fn wrap_index(&self, index: i32) -> TestValue {
        TestValue::Int(i64::from(index))
    }

    fn count_of(&self, value: &TestValue) -> Option<i64> {
        match value {
            TestValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    fn unwrap_foreign(&self, value: TestValue) -> TestValue {
        match value {
            TestValue::Foreign(inner) => *inner,
            other => other,
        }
    }
}
