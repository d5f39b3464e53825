//! Specialized collection types

use slotmap::new_key_type;

pub use slotmap::SlotMap;

new_key_type! {
    /// Stable handle to an object instantiated inside a render context
    pub struct InstanceKey;
}

/// Handle-based map keyed by [`InstanceKey`]
pub type InstanceMap<T> = SlotMap<InstanceKey, T>;
