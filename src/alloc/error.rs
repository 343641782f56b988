use std::fmt;

use crate::model::UseCase;

/// Fatal conditions that abort an allocation run.
#[derive(Debug, Clone, PartialEq)]
pub enum AllocationError {
    /// A process carries a destination code that is not in the lookup table
    /// of its demand class.
    UnknownDestination { destination: String, demand: String },
    /// No candidate exists for a use-case (and region, for home charging).
    NoCandidates {
        use_case: UseCase,
        region: Option<u32>,
    },
    /// A weight vector could not be turned into a sampling distribution.
    InvalidWeights(String),
}

impl fmt::Display for AllocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationError::UnknownDestination {
                destination,
                demand,
            } => write!(f, "allocation error: {demand} destination \"{destination}\" is unknown"),
            AllocationError::NoCandidates {
                use_case,
                region: Some(region),
            } => write!(
                f,
                "allocation error: no {use_case} charging point candidates in region {region}"
            ),
            AllocationError::NoCandidates {
                use_case,
                region: None,
            } => write!(f, "allocation error: no {use_case} charging point candidates"),
            AllocationError::InvalidWeights(msg) => {
                write!(f, "allocation error: invalid weights: {msg}")
            }
        }
    }
}

impl std::error::Error for AllocationError {}
