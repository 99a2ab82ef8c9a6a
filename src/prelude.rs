pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::{Error, Result};
pub use crate::executor::{Runnable, Task, TaskState, Thread};
pub use crate::order::{invert, CompareResult};
pub use crate::scheduler::{BinaryHeap, EntryId, HeapOrder, Priority, ReadyQueue};
pub use crate::sync::{Lock, Mutex, Protected};
