use super::PipelineError;

/// Groups a flat sequence into consecutive triples, keeping the order.
/// A length which is not a multiple of 3 is rejected rather than truncated.
pub fn assemble<T: Copy>(items: &[T]) -> Result<Vec<[T; 3]>, PipelineError> {
    if items.len() % 3 != 0 {
        return Err(PipelineError::IncompleteTriangle { len: items.len() });
    }
    return Ok(items
        .chunks_exact(3)
        .map(|chunk| [chunk[0], chunk[1], chunk[2]])
        .collect());
}
