#![no_main]

use libfuzzer_sys::fuzz_target;
use ngeval::distance::{DistanceMatrix, Metric};
use ngeval::io::parse_matrix;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(matrix) = parse_matrix(input) {
            if matrix.n_rows() <= 64 {
                let dmatrix = DistanceMatrix::from_data(&matrix, Metric::Correlation);
                assert_eq!(dmatrix.len(), matrix.n_rows());
            }
        }
    }
});
