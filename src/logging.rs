use log::{error, info, warn};

pub fn log_parse_failure(deadline: &str, reason: &str) {
    warn!(
        "⏳ Invalid Deadline {:?} — {} (re-assign to fix)",
        deadline, reason
    );
}

pub fn log_network_failure(what: &str, reason: &str) {
    warn!("🌐 {} failed — {} (showing last known data)", what, reason);
}

pub fn log_validation_failure(reason: &str) {
    error!("⚠️ Rejected by server: {}", reason);
}

pub fn log_success(msg: &str) {
    info!("✅ {}", msg);
}
