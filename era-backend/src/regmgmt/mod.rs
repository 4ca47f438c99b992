//! Register Management
//! 
//! Bookkeeping shared by every emission routine:
//! 
//! ## Architecture
//! 
//! - `RegisterPool` - Configured registers, validated once
//! - `RegWindow` - Immutable view of the registers free for one subtree
//! - `SpillSlots` - Per-emission allocator of ebp-relative spill slots
//! 
//! ## Invariants
//! 
//! - A window only ever contains pool registers, each at most once
//! - Spill slots grow monotonically and are never reused within one emission

pub use self::pool::RegisterPool;
pub use self::spill::{SpillRecord, SpillSlots};
pub use self::window::{RegWindow, MAX_POOL_SIZE};

mod pool;
mod spill;
mod window;
