use std::time::Duration;

use crate::error::AppError;
use crate::models::WindowRect;
use crate::opener::Reporter;

/// Per-batch state handed to every tier.
pub struct TierContext<'r, 'a> {
    pub reporter: &'r mut Reporter<'a>,
    pub timeout: Duration,
    pub window_rect: Option<WindowRect>,
}

/// Why a tier gave up on the whole batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierFailure {
    pub message: String,
    /// Forward the failure to the caller as an error on the first path.
    /// Otherwise it is only logged.
    pub surface: bool,
}

impl TierFailure {
    pub fn surfaced(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            surface: true,
        }
    }
}

impl From<AppError> for TierFailure {
    fn from(e: AppError) -> Self {
        Self {
            message: e.to_string(),
            surface: false,
        }
    }
}

/// One technique for opening a batch of folders.
pub trait Tier {
    fn name(&self) -> &'static str;

    /// Cheap capability probe. Must not load or initialise anything.
    fn is_available(&self) -> bool {
        true
    }

    fn attempt(&self, paths: &[String], ctx: &mut TierContext<'_, '_>) -> Result<(), TierFailure>;
}

/// Try `tiers` in order until one succeeds. Returns `false` only if every
/// tier failed or was unavailable.
pub fn run_tiers(tiers: &[&dyn Tier], paths: &[String], ctx: &mut TierContext<'_, '_>) -> bool {
    for tier in tiers {
        if !tier.is_available() {
            log::debug!("Skipping {} (unavailable)", tier.name());
            continue;
        }

        log::info!("Using {} method", tier.name());
        match tier.attempt(paths, ctx) {
            Ok(()) => return true,
            Err(failure) => {
                log::warn!("{} failed: {}", tier.name(), failure.message);
                if failure.surface {
                    if let Some(first) = paths.first() {
                        ctx.reporter.tier_failed(first, &failure.message);
                    }
                }
            }
        }
    }
    false
}
