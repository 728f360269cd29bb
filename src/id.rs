//! Experiment identifiers and collision-free id generation.
//!
//! The canonical string form is `"{program}_{lever}_V{version}"`. Program
//! and lever names never contain `_` (see [`crate::schema`]), so splitting
//! on the delimiter always yields exactly three segments for a well-formed
//! id, and any other segment count is malformed data.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::MalformedId;
use crate::schema::{Lever, Program};

/// Identifier of an experiment record: `(program, lever, version)`.
///
/// Versions start at 1 and grow without bound; the id is assigned once at
/// creation and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExperimentId {
    program: Program,
    lever: Lever,
    version: u64,
}

impl ExperimentId {
    /// Assemble an id from its parts. `version` must be at least 1.
    #[must_use]
    pub const fn new(program: Program, lever: Lever, version: u64) -> Self {
        Self {
            program,
            lever,
            version,
        }
    }

    /// The program segment.
    #[must_use]
    pub const fn program(self) -> Program {
        self.program
    }

    /// The lever segment.
    #[must_use]
    pub const fn lever(self) -> Lever {
        self.lever
    }

    /// The version number.
    #[must_use]
    pub const fn version(self) -> u64 {
        self.version
    }
}

impl fmt::Display for ExperimentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_V{}", self.program, self.lever, self.version)
    }
}

impl FromStr for ExperimentId {
    type Err = MalformedId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |reason: String| MalformedId {
            id: s.to_string(),
            reason,
        };

        let segments: Vec<&str> = s.split('_').collect();
        if segments.len() != 3 {
            return Err(malformed(format!(
                "expected 3 segments separated by '_', found {}",
                segments.len()
            )));
        }

        let program = Program::from_name(segments[0])
            .ok_or_else(|| malformed(format!("unknown program {:?}", segments[0])))?;
        let lever = Lever::from_name(segments[1])
            .ok_or_else(|| malformed(format!("unknown lever {:?}", segments[1])))?;

        let digits = segments[2]
            .strip_prefix('V')
            .ok_or_else(|| malformed("version segment must start with 'V'".to_string()))?;
        if digits.is_empty()
            || digits.starts_with('0')
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(malformed(
                "version must be a positive integer without leading zeros".to_string(),
            ));
        }
        let version: u64 = digits
            .parse()
            .map_err(|_| malformed(format!("version {digits:?} is not a decimal integer")))?;

        Ok(Self::new(program, lever, version))
    }
}

/// Pick the lowest free version for a `(program, lever)` pair.
///
/// Pure function of its inputs: walks versions from 1 and returns the first
/// candidate whose string form is not in `existing_ids`. The caller must
/// re-read ids from the store per operation and insert atomically
/// (insert-if-absent); generation alone cannot reserve the id.
#[must_use]
pub fn generate_id(program: Program, lever: Lever, existing_ids: &HashSet<String>) -> ExperimentId {
    let mut version = 1;
    loop {
        let candidate = ExperimentId::new(program, lever, version);
        if !existing_ids.contains(&candidate.to_string()) {
            return candidate;
        }
        version += 1;
    }
}
