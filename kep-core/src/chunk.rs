use crate::{KepError, SUCCESS_STATUS};

/// Number of chunks `len` items split into at `chunk_size` per chunk.
///
/// `chunk_size` of zero yields zero; callers validate it beforehand.
#[must_use]
pub const fn chunk_count(len: usize, chunk_size: usize) -> usize {
    if chunk_size == 0 {
        return 0;
    }
    len.div_ceil(chunk_size)
}

/// Split `items` into consecutive slices of at most `chunk_size`, in order.
///
/// Only the last slice may be shorter. An empty input yields no slices.
///
/// # Errors
/// Returns `InvalidArg` if `chunk_size` is zero.
pub fn partition<T>(items: &[T], chunk_size: usize) -> Result<Vec<&[T]>, KepError> {
    if chunk_size == 0 {
        return Err(KepError::InvalidArg("chunk_size must be at least 1".into()));
    }
    Ok(items.chunks(chunk_size).collect())
}

/// Result of one delivery attempt as seen by the state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The endpoint acknowledged the chunk.
    Delivered,
    /// The endpoint answered with a non-success status.
    Rejected {
        /// Status code returned by the endpoint.
        status: u16,
    },
}

impl AttemptOutcome {
    /// Classify an HTTP status.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        if status == SUCCESS_STATUS {
            Self::Delivered
        } else {
            Self::Rejected { status }
        }
    }
}

/// Delivery state of a single chunk.
///
/// ```text
/// Pending -> Attempting -> Delivered
///                       -> Retrying -> Attempting
///                       -> Exhausted
/// ```
///
/// Attempt numbers are one-based. A chunk is exhausted on its `max_attempts`-th
/// rejection, so it is attempted at most `max_attempts` times and waits between
/// attempts at most `max_attempts - 1` times.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkState {
    /// Not attempted yet.
    Pending,
    /// A request for this chunk is in flight.
    Attempting {
        /// Attempt number of the in-flight request.
        attempt: u32,
    },
    /// The last attempt was rejected and the budget allows another one.
    Retrying {
        /// Rejections so far.
        failed_attempts: u32,
    },
    /// Terminal: the endpoint acknowledged the chunk.
    Delivered {
        /// Attempts it took, the successful one included.
        attempts: u32,
    },
    /// Terminal: every allowed attempt was rejected.
    Exhausted {
        /// Attempts made, equal to the budget.
        attempts: u32,
    },
}

impl ChunkState {
    /// Move to `Attempting` from `Pending` or `Retrying`; other states are returned as-is.
    #[must_use]
    pub const fn begin_attempt(self) -> Self {
        match self {
            Self::Pending => Self::Attempting { attempt: 1 },
            Self::Retrying { failed_attempts } => Self::Attempting {
                attempt: failed_attempts + 1,
            },
            other => other,
        }
    }

    /// Apply the outcome of the in-flight attempt.
    ///
    /// Only meaningful in `Attempting`; other states are returned as-is.
    #[must_use]
    pub const fn on_outcome(self, outcome: AttemptOutcome, max_attempts: u32) -> Self {
        match (self, outcome) {
            (Self::Attempting { attempt }, AttemptOutcome::Delivered) => {
                Self::Delivered { attempts: attempt }
            }
            (Self::Attempting { attempt }, AttemptOutcome::Rejected { .. }) => {
                if attempt >= max_attempts {
                    Self::Exhausted { attempts: attempt }
                } else {
                    Self::Retrying {
                        failed_attempts: attempt,
                    }
                }
            }
            (other, _) => other,
        }
    }

    /// Transport calls started for this chunk so far.
    #[must_use]
    pub const fn attempts(self) -> u32 {
        match self {
            Self::Pending => 0,
            Self::Attempting { attempt } => attempt,
            Self::Retrying { failed_attempts } => failed_attempts,
            Self::Delivered { attempts } | Self::Exhausted { attempts } => attempts,
        }
    }

    /// Whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered { .. } | Self::Exhausted { .. })
    }
}
