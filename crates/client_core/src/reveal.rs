use anyhow::Result;
use shared::domain::{ClassificationResult, SelectionId};

/// Best-effort presentation step run shortly after a successful
/// classification, e.g. bringing the result into view. Errors are logged and
/// never touch session state.
pub trait RevealHook: Send + Sync {
    fn reveal(&self, selection: SelectionId, result: &ClassificationResult) -> Result<()>;
}

pub struct NoopReveal;

impl RevealHook for NoopReveal {
    fn reveal(&self, _selection: SelectionId, _result: &ClassificationResult) -> Result<()> {
        Ok(())
    }
}
