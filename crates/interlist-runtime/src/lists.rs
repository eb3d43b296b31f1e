//! Standard list classes.
//!
//! Every class here implements `size()`, `get(int)` and `set(int, any)` over
//! the object's slots. Each definition creates a fresh class identity.

use interlist_dispatch::Operation;

use crate::exception::HostException;
use crate::klass::{KlassBuilder, KlassRef};
use crate::object::HostObject;
use crate::registry::ClassRegistry;
use crate::value::Value;

pub const ARRAY_LIST: &str = "ArrayList";
pub const IMMUTABLE_LIST: &str = "ImmutableList";
pub const INT_LIST: &str = "IntList";
pub const COW_LIST: &str = "CowList";

/// Names of the classes installed by [`define_standard_lists`].
pub const STANDARD_LISTS: [&str; 4] = [ARRAY_LIST, IMMUTABLE_LIST, INT_LIST, COW_LIST];

/// Index argument of `get`/`set`. Marshalling guarantees an integral value.
fn index_arg(args: &[Value]) -> i64 {
    args.first().and_then(Value::as_integer).unwrap_or(-1)
}

fn slot_index(index: i64, len: usize) -> Option<usize> {
    usize::try_from(index).ok().filter(|&i| i < len)
}

fn size(receiver: &HostObject, _args: &[Value]) -> Result<Value, HostException> {
    let len = receiver.slots().len();
    // The host `int` is 32 bits wide; larger lists report saturated sizes.
    Ok(Value::Int(i32::try_from(len).unwrap_or(i32::MAX)))
}

fn get(receiver: &HostObject, args: &[Value]) -> Result<Value, HostException> {
    let index = index_arg(args);
    let slots = receiver.slots();
    slot_index(index, slots.len())
        .map(|i| slots[i].clone())
        .ok_or_else(|| HostException::index_out_of_bounds(index, slots.len()))
}

fn set(receiver: &HostObject, args: &[Value]) -> Result<Value, HostException> {
    let index = index_arg(args);
    let value = args.get(1).cloned().unwrap_or(Value::Nil);
    let mut slots = receiver.slots_mut();
    let len = slots.len();
    let i = slot_index(index, len).ok_or_else(|| HostException::index_out_of_bounds(index, len))?;
    Ok(std::mem::replace(&mut slots[i], value))
}

/// Growable, mutable list.
pub fn array_list() -> KlassBuilder {
    list_builder(ARRAY_LIST)
        .method("get", Operation::GET_SIGNATURE, get)
        .method("set", Operation::SET_SIGNATURE, set)
}

/// `set` always raises `UnsupportedOperation`, even out of range.
pub fn immutable_list() -> KlassBuilder {
    list_builder(IMMUTABLE_LIST)
        .method("get", Operation::GET_SIGNATURE, get)
        .method("set", Operation::SET_SIGNATURE, |_, _| {
            Err(HostException::unsupported_operation("ImmutableList.set"))
        })
}

/// Only stores integral values; anything else raises `ClassCast`.
pub fn int_list() -> KlassBuilder {
    list_builder(INT_LIST)
        .method("get", Operation::GET_SIGNATURE, get)
        .method("set", Operation::SET_SIGNATURE, |receiver, args| {
            match args.get(1) {
                Some(value) if value.is_integral() => set(receiver, args),
                Some(value) => Err(HostException::class_cast(format!(
                    "{} cannot be cast to int",
                    value.type_name()
                ))),
                None => set(receiver, args),
            }
        })
}

/// Copy-on-write list. Out-of-range access raises `ArrayIndexOutOfBounds`.
pub fn cow_list() -> KlassBuilder {
    list_builder(COW_LIST)
        .method("get", Operation::GET_SIGNATURE, |receiver, args| {
            let index = index_arg(args);
            let snapshot = receiver.slots().clone();
            slot_index(index, snapshot.len())
                .map(|i| snapshot[i].clone())
                .ok_or_else(|| HostException::array_index_out_of_bounds(index, snapshot.len()))
        })
        .method("set", Operation::SET_SIGNATURE, |receiver, args| {
            let index = index_arg(args);
            let mut copy = receiver.slots().clone();
            let i = slot_index(index, copy.len())
                .ok_or_else(|| HostException::array_index_out_of_bounds(index, copy.len()))?;
            let value = args.get(1).cloned().unwrap_or(Value::Nil);
            let previous = std::mem::replace(&mut copy[i], value);
            *receiver.slots_mut() = copy;
            Ok(previous)
        })
}

/// A builder with only the list `size` method, for custom list classes.
pub fn list_builder(name: &str) -> KlassBuilder {
    KlassBuilder::new(name).method("size", Operation::SIZE_SIGNATURE, size)
}

/// Define one class of each standard list kind.
pub fn define_standard_lists(registry: &ClassRegistry) -> Vec<KlassRef> {
    vec![
        registry.define(array_list()),
        registry.define(immutable_list()),
        registry.define(int_list()),
        registry.define(cow_list()),
    ]
}
