//! Errors raised while deriving stage options.
//!
//! Every variant is a broken contract with an upstream collaborator (the
//! partition allocator or the caller choosing formats and architectures).
//! None of them are retried. The build that produced them must stop.

/// Result alias used by all derivers.
pub type Result<T> = std::result::Result<T, StageError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StageError {
    #[error("failed to find boot or root partition for {stage} stage")]
    BootPartitionMissing { stage: &'static str },

    #[error("unknown format in qemu stage: {0}")]
    UnknownFormat(String),

    #[error("unknown architecture: {0}")]
    UnknownArch(String),

    #[error("architecture {arch} is not supported by the {stage} stage")]
    UnsupportedArch { arch: String, stage: &'static str },

    #[error("{what} of {bytes} bytes is not a multiple of the {sector_size} byte sector size")]
    Misaligned {
        what: String,
        bytes: u64,
        sector_size: u64,
    },

    #[error("invalid sector size {0}: must be a non-zero power of two")]
    InvalidSectorSize(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_violation() {
        let err = StageError::BootPartitionMissing {
            stage: "org.osbuild.zipl.inst",
        };
        assert_eq!(
            err.to_string(),
            "failed to find boot or root partition for org.osbuild.zipl.inst stage"
        );

        let err = StageError::Misaligned {
            what: "partition 2 start".to_string(),
            bytes: 1000,
            sector_size: 512,
        };
        assert!(err.to_string().contains("1000 bytes"));
        assert!(err.to_string().contains("512 byte sector size"));
    }
}
