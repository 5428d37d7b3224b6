use chrono::Utc;
use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

pub const USER_PREFIX: &str = "user";
pub const PROPERTY_PREFIX: &str = "prop";
pub const ALERT_PREFIX: &str = "alert";

/// Builds `<prefix>-<unix millis>-<9 base36 chars>`.
pub fn generate_id(prefix: &str) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    format!("{}-{}-{}", prefix, Utc::now().timestamp_millis(), suffix)
}
