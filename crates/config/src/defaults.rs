//! Default values applied during deserialization

pub fn default_log_format() -> String {
    "pretty".to_string()
}

pub fn default_service_name() -> String {
    "nftopt".to_string()
}
