// Self-test metrics and JSON reports for the boundary round trip

use std::error::Error;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::serde::ts_seconds;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::slh::{Bridge, ParameterCatalog, ParameterSet, ReportedError, SlhBackend};

const SELF_TEST_MESSAGE: &[u8] = b"SLH-DSA boundary self-test";
const SELF_TEST_CONTEXT: &[u8] = b"selftest";

/// Timings and sizes from one keygen/sign/verify round trip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelfTestMetrics {
    pub scheme: String,
    pub keygen_time: Duration,
    pub sign_time: Duration,
    pub verify_time: Duration,
    /// Encoded (tagged) key sizes
    pub public_key_bytes: usize,
    pub private_key_bytes: usize,
    pub signature_bytes: usize,
    /// Signature accepted, and a tampered copy rejected
    pub verified: bool,
    #[serde(with = "ts_seconds")]
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl SelfTestMetrics {
    pub fn measure_time<F, R>(f: F) -> (Duration, R)
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        (start.elapsed(), result)
    }
}

/// Switch `bridge` to `set` and run one round trip through its boundary
/// operations.
///
/// The bridge is left on `set` afterwards.
pub fn run_self_test<C, B>(
    bridge: &Bridge<C, B>,
    set: ParameterSet,
) -> Result<SelfTestMetrics, ReportedError>
where
    C: ParameterCatalog,
    B: SlhBackend,
{
    bridge.initialize_config(set.id() as i32)?;

    let (keygen_time, pair) = SelfTestMetrics::measure_time(|| bridge.keygen());
    let pair = pair?;

    let (sign_time, signature) = SelfTestMetrics::measure_time(|| {
        bridge.sign(
            Some(SELF_TEST_MESSAGE),
            Some(SELF_TEST_CONTEXT),
            Some(pair.private_key.as_slice()),
        )
    });
    let signature = signature?;

    let (verify_time, accepted) = SelfTestMetrics::measure_time(|| {
        bridge.verify(
            Some(SELF_TEST_MESSAGE),
            Some(signature.as_slice()),
            Some(SELF_TEST_CONTEXT),
            Some(pair.public_key.as_slice()),
        )
    });
    let accepted = accepted?;

    let mut tampered = signature.clone();
    if let Some(last) = tampered.last_mut() {
        *last ^= 0x01;
    }
    let rejected = !bridge.verify(
        Some(SELF_TEST_MESSAGE),
        Some(tampered.as_slice()),
        Some(SELF_TEST_CONTEXT),
        Some(pair.public_key.as_slice()),
    )?;

    info!(scheme = %set, ?sign_time, ?verify_time, "self-test round trip finished");

    Ok(SelfTestMetrics {
        scheme: set.name().to_string(),
        keygen_time,
        sign_time,
        verify_time,
        public_key_bytes: pair.public_key.len(),
        private_key_bytes: pair.private_key.len(),
        signature_bytes: signature.len(),
        verified: accepted && rejected,
        timestamp: chrono::Utc::now(),
    })
}

#[derive(Debug, Default)]
pub struct SelfTestReport {
    runs: Vec<SelfTestMetrics>,
}

impl SelfTestReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_metrics(&mut self, metrics: SelfTestMetrics) {
        self.runs.push(metrics);
    }

    pub fn runs(&self) -> &[SelfTestMetrics] {
        &self.runs
    }

    pub fn all_verified(&self) -> bool {
        !self.runs.is_empty() && self.runs.iter().all(|run| run.verified)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.runs)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn Error>> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn summary(&self) -> String {
        if self.runs.is_empty() {
            return "No self-test runs".to_string();
        }

        let mut out = String::from("Self-test Summary:\n");
        for run in &self.runs {
            out.push_str(&format!(
                "  {:<20} keygen {:>9.3}ms  sign {:>9.3}ms  verify {:>8.3}ms  sig {:>6} B  {}\n",
                run.scheme,
                run.keygen_time.as_secs_f64() * 1000.0,
                run.sign_time.as_secs_f64() * 1000.0,
                run.verify_time.as_secs_f64() * 1000.0,
                run.signature_bytes,
                if run.verified { "ok" } else { "FAILED" },
            ));
        }
        out
    }
}
