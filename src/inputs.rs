//! Input-tuple machinery: wiring typed edges into positional task slots and
//! validating callables against them.
//!
//! Rust lacks variadic generics, so the traits here are implemented for
//! each tuple arity up to 8 via macros. This is the standard approach for
//! heterogeneous tuples and keeps the whole wiring surface checked at
//! compile time: a mismatched callable signature, an out-of-range slot
//! index, or an attach-by-type on a type the task does not declare all fail
//! to compile rather than at runtime.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::edge::Edge;
use crate::node::GraphEdge;

/// A positional inward slot of a task: the wired edge, if any.
///
/// Slots are wired single-threaded during graph construction and read by
/// the worker executing the task; the interior mutex makes that hand-off
/// safe without requiring `&mut` access through the owning `Arc`.
pub struct InputSlot<T> {
    edge: Mutex<Option<Arc<Edge<T>>>>,
}

impl<T> Default for InputSlot<T> {
    fn default() -> Self {
        Self {
            edge: Mutex::new(None),
        }
    }
}

impl<T> InputSlot<T> {
    pub(crate) fn attach(&self, edge: Arc<Edge<T>>) {
        *self.edge.lock() = Some(edge);
    }
}

impl<T: Send + Sync + 'static> InputSlot<T> {
    /// The wired edge, type-erased for traversal.
    pub(crate) fn erased(&self) -> Option<Arc<dyn GraphEdge>> {
        self.edge
            .lock()
            .clone()
            .map(|edge| edge as Arc<dyn GraphEdge>)
    }
}

impl<T: Clone + Default + Send + Sync + 'static> InputSlot<T> {
    /// The callable's argument for this slot: the edge's value once
    /// latched, or a default value when the slot was left unattached.
    pub(crate) fn value(&self) -> T {
        let edge = self.edge.lock().clone();
        match edge {
            Some(edge) => edge.wait().clone(),
            None => T::default(),
        }
    }
}

/// The declared input list of a task, as a tuple type.
///
/// Implemented for `()` and for tuples of 1 to 8 elements, each element
/// being `Clone + Default + Send + Sync + 'static`. A `()` element is a
/// pure dependency: the task waits on the wired signal edge and the
/// callable receives the unit value, which costs nothing.
///
/// This trait is not meant for external implementation; users only pick a
/// tuple type when constructing a [`crate::Task`].
pub trait InputList: Send + Sync + 'static {
    /// One [`InputSlot`] per declared input, in positional order.
    type Slots: Default + Send + Sync + 'static;
    /// The owned argument tuple handed to the callable.
    type Values;
    /// Number of declared inputs.
    const LEN: usize;

    /// Positional, type-erased snapshot of the wired edges.
    fn erased(slots: &Self::Slots) -> Vec<Option<Arc<dyn GraphEdge>>>;

    /// Collect the callable's arguments, blocking on any edge that has not
    /// latched yet.
    fn values(slots: &Self::Slots) -> Self::Values;
}

impl InputList for () {
    type Slots = ();
    type Values = ();
    const LEN: usize = 0;

    fn erased(_slots: &Self::Slots) -> Vec<Option<Arc<dyn GraphEdge>>> {
        Vec::new()
    }

    fn values(_slots: &Self::Slots) -> Self::Values {}
}

macro_rules! impl_input_list {
    ($len:expr; $(($T:ident, $idx:tt)),+) => {
        impl<$($T),+> InputList for ($($T,)+)
        where
            $($T: Clone + Default + Send + Sync + 'static),+
        {
            type Slots = ($(InputSlot<$T>,)+);
            type Values = ($($T,)+);
            const LEN: usize = $len;

            fn erased(slots: &Self::Slots) -> Vec<Option<Arc<dyn GraphEdge>>> {
                vec![$(slots.$idx.erased()),+]
            }

            fn values(slots: &Self::Slots) -> Self::Values {
                ($(slots.$idx.value(),)+)
            }
        }
    };
}

impl_input_list!(1; (A, 0));
impl_input_list!(2; (A, 0), (B, 1));
impl_input_list!(3; (A, 0), (B, 1), (C, 2));
impl_input_list!(4; (A, 0), (B, 1), (C, 2), (D, 3));
impl_input_list!(5; (A, 0), (B, 1), (C, 2), (D, 3), (E, 4));
impl_input_list!(6; (A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5));
impl_input_list!(7; (A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5), (G, 6));
impl_input_list!(8; (A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5), (G, 6), (H, 7));

/// Positional access into a slot tuple; `J` is the zero-based slot index.
///
/// An out-of-range `J` has no implementation and fails to compile.
pub trait SlotAt<const J: usize> {
    /// The declared input type at position `J`.
    type Input;

    fn slot(&self) -> &InputSlot<Self::Input>;
}

/// Marker resolving a [`SlotOf`] impl to a slot position. Inference picks
/// it; user code never names it.
pub struct Index<const J: usize>;

/// Access to the unique slot of input type `T`.
///
/// When `T` is not among the task's declared inputs no implementation
/// exists and the call fails to compile; when `T` occurs more than once
/// the marker parameter is ambiguous, which is also a compile-time error.
pub trait SlotOf<T, Marker> {
    fn slot_of(&self) -> &InputSlot<T>;
}

macro_rules! impl_slot_access {
    ([$($T:ident),+], $idx:tt, $Sel:ident) => {
        impl<$($T),+> SlotAt<$idx> for ($(InputSlot<$T>,)+) {
            type Input = $Sel;

            fn slot(&self) -> &InputSlot<$Sel> {
                &self.$idx
            }
        }

        impl<$($T),+> SlotOf<$Sel, Index<$idx>> for ($(InputSlot<$T>,)+) {
            fn slot_of(&self) -> &InputSlot<$Sel> {
                &self.$idx
            }
        }
    };
}

impl_slot_access!([A], 0, A);
impl_slot_access!([A, B], 0, A);
impl_slot_access!([A, B], 1, B);
impl_slot_access!([A, B, C], 0, A);
impl_slot_access!([A, B, C], 1, B);
impl_slot_access!([A, B, C], 2, C);
impl_slot_access!([A, B, C, D], 0, A);
impl_slot_access!([A, B, C, D], 1, B);
impl_slot_access!([A, B, C, D], 2, C);
impl_slot_access!([A, B, C, D], 3, D);
impl_slot_access!([A, B, C, D, E], 0, A);
impl_slot_access!([A, B, C, D, E], 1, B);
impl_slot_access!([A, B, C, D, E], 2, C);
impl_slot_access!([A, B, C, D, E], 3, D);
impl_slot_access!([A, B, C, D, E], 4, E);
impl_slot_access!([A, B, C, D, E, F], 0, A);
impl_slot_access!([A, B, C, D, E, F], 1, B);
impl_slot_access!([A, B, C, D, E, F], 2, C);
impl_slot_access!([A, B, C, D, E, F], 3, D);
impl_slot_access!([A, B, C, D, E, F], 4, E);
impl_slot_access!([A, B, C, D, E, F], 5, F);
impl_slot_access!([A, B, C, D, E, F, G], 0, A);
impl_slot_access!([A, B, C, D, E, F, G], 1, B);
impl_slot_access!([A, B, C, D, E, F, G], 2, C);
impl_slot_access!([A, B, C, D, E, F, G], 3, D);
impl_slot_access!([A, B, C, D, E, F, G], 4, E);
impl_slot_access!([A, B, C, D, E, F, G], 5, F);
impl_slot_access!([A, B, C, D, E, F, G], 6, G);
impl_slot_access!([A, B, C, D, E, F, G, H], 0, A);
impl_slot_access!([A, B, C, D, E, F, G, H], 1, B);
impl_slot_access!([A, B, C, D, E, F, G, H], 2, C);
impl_slot_access!([A, B, C, D, E, F, G, H], 3, D);
impl_slot_access!([A, B, C, D, E, F, G, H], 4, E);
impl_slot_access!([A, B, C, D, E, F, G, H], 5, F);
impl_slot_access!([A, B, C, D, E, F, G, H], 6, G);
impl_slot_access!([A, B, C, D, E, F, G, H], 7, H);

/// A callable acceptable as a task body: any `FnOnce` whose parameter list
/// matches the task's declared input tuple in order and whose return type
/// is the task's output.
///
/// The trait bound on [`crate::Task::new`] is the compile-time signature
/// check: a closure with the wrong arity, a mismatched parameter type, or
/// the wrong return type is rejected before the program ever runs.
pub trait TaskFn<In: InputList, Out>: Send + 'static {
    fn call(self: Box<Self>, inputs: In::Values) -> Out;
}

impl<F, Out> TaskFn<(), Out> for F
where
    F: FnOnce() -> Out + Send + 'static,
{
    fn call(self: Box<Self>, _inputs: ()) -> Out {
        (self)()
    }
}

macro_rules! impl_task_fn {
    ($(($T:ident, $val:ident)),+) => {
        impl<F, Out, $($T),+> TaskFn<($($T,)+), Out> for F
        where
            F: FnOnce($($T),+) -> Out + Send + 'static,
            $($T: Clone + Default + Send + Sync + 'static),+
        {
            fn call(self: Box<Self>, ($($val,)+): ($($T,)+)) -> Out {
                (self)($($val),+)
            }
        }
    };
}

impl_task_fn!((A, a));
impl_task_fn!((A, a), (B, b));
impl_task_fn!((A, a), (B, b), (C, c));
impl_task_fn!((A, a), (B, b), (C, c), (D, d));
impl_task_fn!((A, a), (B, b), (C, c), (D, d), (E, e));
impl_task_fn!((A, a), (B, b), (C, c), (D, d), (E, e), (F2, f));
impl_task_fn!((A, a), (B, b), (C, c), (D, d), (E, e), (F2, f), (G, g));
impl_task_fn!((A, a), (B, b), (C, c), (D, d), (E, e), (F2, f), (G, g), (H, h));
