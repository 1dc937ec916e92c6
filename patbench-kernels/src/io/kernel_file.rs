//! Convolution kernel files: whitespace-separated integers, odd count.

use crate::error::FormatError;
use patbench_core::KernelTable;
use std::path::Path;

/// Parse the 1-D weights of a kernel file
pub fn parse_kernel(text: &str) -> Result<Vec<i64>, FormatError> {
    let weights = text
        .split_whitespace()
        .enumerate()
        .map(|(position, token)| {
            token.parse::<i64>().map_err(|_| FormatError::KernelToken {
                token: token.to_string(),
                position,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if weights.len() % 2 == 0 {
        return Err(FormatError::KernelParity(weights.len()));
    }
    Ok(weights)
}

/// Read a kernel file and expand it into its square cross-product table
pub fn load_kernel(path: impl AsRef<Path>) -> Result<KernelTable, FormatError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| FormatError::io(path, e))?;
    let weights = parse_kernel(&text)?;
    tracing::debug!(path = %path.display(), side = weights.len(), "loaded kernel");
    Ok(KernelTable::from_separable(&weights)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kernel() {
        assert_eq!(parse_kernel("1 2 1").unwrap(), vec![1, 2, 1]);
        assert_eq!(parse_kernel("  -1\n0\t 1\n").unwrap(), vec![-1, 0, 1]);
    }

    #[test]
    fn test_even_count_rejected() {
        assert!(matches!(
            parse_kernel("1 1"),
            Err(FormatError::KernelParity(2))
        ));
        assert!(matches!(parse_kernel(""), Err(FormatError::KernelParity(0))));
    }

    #[test]
    fn test_bad_token() {
        match parse_kernel("1 x 1") {
            Err(FormatError::KernelToken { token, position }) => {
                assert_eq!(token, "x");
                assert_eq!(position, 1);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_overflowing_kernel_file() {
        let path = std::env::temp_dir().join(format!(
            "patbench-overflow-kernel-{}.txt",
            std::process::id()
        ));
        std::fs::write(&path, "1 4000000000 1\n").unwrap();
        let err = load_kernel(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(
            err,
            FormatError::Pattern(patbench_core::PatternError::KernelOverflow(3))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = load_kernel("/nonexistent/patbench/kernel.txt").unwrap_err();
        assert!(matches!(err, FormatError::Io { .. }));
        assert!(err.to_string().contains("kernel.txt"));
    }
}
