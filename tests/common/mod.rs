#![allow(unused_imports)]

pub use reconflow_test_utils::builders;
pub use reconflow_test_utils::recorder::{Recorder, SnapshotLog};
pub use reconflow_test_utils::{init_tracing, with_timeout};
