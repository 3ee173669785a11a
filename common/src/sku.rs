//! SKU（在庫管理番号）の書式
//!
//! `PRD-{ミリ秒時刻の36進数}-{5文字の乱数部}`。乱数部は呼び出し側が用意する。

const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub const SKU_PREFIX: &str = "PRD";

pub fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

/// 乱数値から5文字の接尾辞を作る
pub fn suffix_from(entropy: u64) -> String {
    let mut suffix = to_base36(entropy % 36u64.pow(5));
    while suffix.len() < 5 {
        suffix.insert(0, '0');
    }
    suffix
}

pub fn format_sku(timestamp_ms: u64, entropy: u64) -> String {
    format!("{}-{}-{}", SKU_PREFIX, to_base36(timestamp_ms), suffix_from(entropy))
}
