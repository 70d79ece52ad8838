//! Random array generation.

use rand::Rng;

use crate::error::{IngestError, Result};
use crate::import::parse_leading_int;

/// Generation is capped below this many elements to bound payload size.
pub const MAX_GENERATED: i64 = 3_000_000;

/// Generation inputs as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateParams {
    pub count: String,
    pub min: String,
    pub max: String,
}

impl Default for GenerateParams {
    fn default() -> Self {
        Self::new("10", "1", "100")
    }
}

impl GenerateParams {
    pub fn new(count: impl Into<String>, min: impl Into<String>, max: impl Into<String>) -> Self {
        Self {
            count: count.into(),
            min: min.into(),
            max: max.into(),
        }
    }

    /// Validate the inputs. The first failing check wins.
    pub fn validate(&self) -> Result<GenerateSpec> {
        let (Some(count), Some(min), Some(max)) = (
            parse_leading_int(&self.count),
            parse_leading_int(&self.min),
            parse_leading_int(&self.max),
        ) else {
            return Err(IngestError::NotAnInteger);
        };

        if count <= 0 {
            return Err(IngestError::CountTooSmall { count });
        }
        if count >= MAX_GENERATED {
            return Err(IngestError::CountTooLarge { count });
        }
        if min >= max {
            return Err(IngestError::EmptyRange { min, max });
        }

        Ok(GenerateSpec {
            count: count.unsigned_abs() as usize,
            min,
            max,
        })
    }
}

/// Validated generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateSpec {
    pub count: usize,
    pub min: i64,
    pub max: i64,
}

/// Draw `spec.count` values uniformly from `[min, max]` using `rng`.
pub fn generate_with<R: Rng + ?Sized>(spec: GenerateSpec, rng: &mut R) -> Vec<i64> {
    (0..spec.count)
        .map(|_| rng.random_range(spec.min..=spec.max))
        .collect()
}

/// Draw values with the thread-local generator.
pub fn generate(spec: GenerateSpec) -> Vec<i64> {
    generate_with(spec, &mut rand::rng())
}
