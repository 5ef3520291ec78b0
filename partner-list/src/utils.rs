use std::sync::atomic::AtomicU64;

macro_rules! defined_id_gen {
    ($name:ident) => {
        pub(crate) fn $name() -> u64 {
            static COUNTER: AtomicU64 = AtomicU64::new(0);
            COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed)
        }
    };
}

defined_id_gen!(new_source_id);
defined_id_gen!(new_paginator_id);

/// Milliseconds elapsed since `start`, the unit load events are recorded in.
pub(crate) fn elapsed_ms_since(start: chrono::DateTime<chrono::Utc>) -> i64 {
    (chrono::Utc::now() - start).num_milliseconds()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_unique() {
        let a = new_source_id();
        let b = new_source_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_elapsed_non_negative() {
        assert!(elapsed_ms_since(chrono::Utc::now()) >= 0);
    }
}
