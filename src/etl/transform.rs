//! Transformer trait for data transformation

use eyre::Result;

/// Transformer trait for transforming data items
///
/// Implementors define how to transform items:
/// - Parsing raw text fields into typed values
/// - Data enrichment (joining in reference data)
/// - Projection to an output shape
///
/// # Example
/// ```
/// use txn_stager::etl::Transformer;
/// use eyre::Result;
///
/// struct Doubler;
///
/// impl Transformer for Doubler {
///     type Input = i64;
///     type Output = i64;
///
///     fn transform(&self, input: Self::Input) -> Result<Self::Output> {
///         Ok(input * 2)
///     }
/// }
///
/// assert_eq!(Doubler.transform_many(vec![1, 2]).unwrap(), vec![2, 4]);
/// ```
pub trait Transformer {
    /// Input item type
    type Input;

    /// Output item type after transformation
    type Output;

    /// Transform a single item
    ///
    /// # Errors
    /// Returns an error if transformation fails (validation, conversion, etc.)
    fn transform(&self, input: Self::Input) -> Result<Self::Output>;

    /// Transform multiple items, stopping at the first failure
    ///
    /// Override this for optimized batch processing
    fn transform_many(&self, inputs: Vec<Self::Input>) -> Result<Vec<Self::Output>> {
        inputs.into_iter().map(|i| self.transform(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RejectNegative;

    impl Transformer for RejectNegative {
        type Input = i32;
        type Output = u32;

        fn transform(&self, input: Self::Input) -> Result<Self::Output> {
            u32::try_from(input).map_err(|_| eyre::eyre!("negative input: {}", input))
        }
    }

    #[test]
    fn test_transform_many_preserves_order() {
        let output = RejectNegative.transform_many(vec![3, 1, 2]).unwrap();
        assert_eq!(output, vec![3, 1, 2]);
    }

    #[test]
    fn test_transform_many_fails_on_first_error() {
        let err = RejectNegative
            .transform_many(vec![1, -4, -5])
            .unwrap_err();
        assert!(err.to_string().contains("-4"));
    }
}
