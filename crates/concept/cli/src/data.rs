//! Input data loading.

use std::path::Path;

use tracing::{debug, warn};

use concept_types::Tensor;

use crate::config::InputGrid;
use crate::error::{CliError, CliResult};

/// Parse whitespace- or comma-separated reals.
pub fn parse_data(text: &str) -> CliResult<Vec<f64>> {
    let mut values = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.split('#').next().unwrap_or("");
        for token in line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
        {
            let value: f64 = token.parse().map_err(|_| {
                CliError::InvalidData(format!("line {}: '{}' is not a number", line_no + 1, token))
            })?;
            if !value.is_finite() {
                return Err(CliError::InvalidData(format!(
                    "line {}: '{}' is not finite",
                    line_no + 1,
                    token
                )));
            }
            values.push(value);
        }
    }
    Ok(values)
}

/// Load a one-dimensional input tensor from `path`, or the default grid.
pub fn load_data(path: Option<&Path>, grid: &InputGrid) -> CliResult<Tensor> {
    let Some(path) = path else {
        debug!(start = grid.start, end = grid.end, points = grid.points, "using default input grid");
        return Ok(Tensor::linspace(grid.start, grid.end, grid.points));
    };
    let text = std::fs::read_to_string(path)?;
    let values = parse_data(&text).map_err(|e| {
        warn!(path = %path.display(), error = %e, "could not parse data file");
        e
    })?;
    if values.is_empty() {
        return Err(CliError::InvalidData(format!(
            "{} contains no values",
            path.display()
        )));
    }
    debug!(path = %path.display(), values = values.len(), "data loaded");
    Ok(Tensor::from_vec(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_mixed_separators_and_comments() {
        let values = parse_data("1, 2.5\n-3e-1\t4 # trailing\n\n# only a comment\n").unwrap();
        assert_eq!(values, vec![1.0, 2.5, -0.3, 4.0]);
    }

    #[test]
    fn rejects_garbage_and_non_finite() {
        let err = parse_data("1 2\nabc").unwrap_err();
        assert!(err.to_string().contains("line 2"));
        assert!(parse_data("inf").is_err());
        assert!(parse_data("NaN").is_err());
    }

    #[test]
    fn default_grid_when_no_file() {
        let t = load_data(None, &InputGrid::default()).unwrap();
        assert_eq!(t.len(), 100);
        assert_eq!(t.data()[0], -1.0);
        assert!((t.data()[99] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn loads_file_and_rejects_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0.1,0.2,0.3").unwrap();
        let t = load_data(Some(file.path()), &InputGrid::default()).unwrap();
        assert_eq!(t.shape(), &[3]);

        let empty = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(
            load_data(Some(empty.path()), &InputGrid::default()),
            Err(CliError::InvalidData(_))
        ));
    }
}
