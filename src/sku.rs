//! SKUの自動生成

use product_wizard_common::sku::format_sku;
use sha2::{Digest, Sha256};

/// 現在時刻とプロセスIDから乱数部を作ってSKUを生成
pub fn generate() -> String {
    let now = chrono::Utc::now();
    let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();
    let nanos = now.timestamp_subsec_nanos();
    format_sku(millis, entropy(&[nanos.to_le_bytes(), std::process::id().to_le_bytes()]))
}

fn entropy<T: AsRef<[u8]>>(parts: &[T]) -> u64 {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_ref());
    }
    let digest = hex::encode(hasher.finalize());
    u64::from_str_radix(&digest[..16], 16).unwrap_or_default()
}
