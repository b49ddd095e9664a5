//! Engine configuration

use std::time::Duration;

/// Engine configuration
///
/// Loaded from the environment with sensible defaults; embedding hosts may
/// also construct it directly (all fields are public).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Per-order lock acquisition timeout; expiry surfaces as `OrderBusy`
    pub lock_timeout: Duration,
    /// Audit channel capacity; overflow drops the entry (logged, never fatal)
    pub audit_buffer: usize,
    /// Event broadcast channel capacity
    pub event_capacity: usize,
    /// Default service charge fraction applied to new orders (0.10 = 10%)
    pub service_charge_pct: f64,
    /// Default VAT fraction applied to new orders (0.21 = 21%)
    pub vat_pct: f64,
    /// How far the running payment sum may exceed a bill's grand total.
    /// Zero means exact settlement; raise it only for cash-rounding policies.
    pub overpayment_tolerance: f64,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl EngineConfig {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self {
            lock_timeout: Duration::from_millis(env_parse("ORDER_LOCK_TIMEOUT_MS", 250)),
            audit_buffer: env_parse("AUDIT_BUFFER_SIZE", 1024),
            event_capacity: env_parse("EVENT_CHANNEL_CAPACITY", 4096),
            service_charge_pct: env_parse("SERVICE_CHARGE_PCT", 0.10),
            vat_pct: env_parse("VAT_PCT", 0.21),
            overpayment_tolerance: env_parse("OVERPAYMENT_TOLERANCE", 0.0),
        }
    }

    /// Override the charge rates, keeping everything else.
    pub fn with_rates(mut self, service_charge_pct: f64, vat_pct: f64) -> Self {
        self.service_charge_pct = service_charge_pct;
        self.vat_pct = vat_pct;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
