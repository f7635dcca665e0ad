//! Long-running background tasks spawned by the server entrypoint.

pub mod overdue;
