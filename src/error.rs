use thiserror::Error;

// Unified error type for parareg

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegError {
    #[error("singular matrix: pivot column {column} has max |a| = {pivot:e}")]
    SingularMatrix { column: usize, pivot: f64 },
    #[error("precondition violated: {0}")]
    Precondition(String),
    #[error("could not allocate {len} elements for {what}")]
    ResourceExhaustion { what: &'static str, len: usize },
    #[error("participant at rank {rank} left the group")]
    PeerLost { rank: usize },
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("communicator initialization failed: {0}")]
    CommInit(String),
}

/// Allocate a zero-filled buffer, reporting allocation failure instead of aborting.
pub fn zeroed(what: &'static str, len: usize) -> Result<Vec<f64>, RegError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| RegError::ResourceExhaustion { what, len })?;
    buf.resize(len, 0.0);
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_reports_exhaustion() {
        let err = zeroed("test buffer", usize::MAX).unwrap_err();
        assert_eq!(
            err,
            RegError::ResourceExhaustion { what: "test buffer", len: usize::MAX }
        );
    }

    #[test]
    fn zeroed_fills_with_zero() {
        let buf = zeroed("test buffer", 4).unwrap();
        assert_eq!(buf, vec![0.0; 4]);
    }
}
