use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::OnceLock;

/// 当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn sequence() -> &'static AtomicI64 {
    static SEQ: OnceLock<AtomicI64> = OnceLock::new();
    SEQ.get_or_init(|| {
        use rand::Rng;
        // Random start so concurrent processes do not stomp each other
        AtomicI64::new(rand::thread_rng().gen_range(0..0x1000))
    })
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: per-process sequence, randomly seeded (4096 ids per ms)
pub fn snowflake_id() -> i64 {
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let ts = (now_millis() - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let seq = sequence().fetch_add(1, Ordering::Relaxed) & 0xFFF; // 12 bits
    (ts << 12) | seq
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snowflake_ids_are_positive_and_unique() {
        let ids: Vec<i64> = (0..256).map(|_| snowflake_id()).collect();
        assert!(ids.iter().all(|id| *id > 0));
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), ids.len());
    }
}
