//! Integration tests for the storage models and the report built on them.

use approx::assert_relative_eq;
use sparsegrind::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

/// 2 × 2 matrix holding `[1, 1, 1, 2]`: nnz 4, index pointer length 3.
fn scenario_matrix() -> SparseMatrix {
    SparseMatrix::from_triplets(
        (2, 2),
        &[(0, 0, 1.0), (0, 1, 1.0), (1, 0, 1.0), (1, 1, 2.0)],
    )
    .unwrap()
}

/// Symmetric positive-definite 2D Laplacian on a `k × k` grid.
fn laplacian(k: usize) -> SparseMatrix {
    let n = k * k;
    let mut triplets = Vec::new();
    for i in 0..n {
        triplets.push((i, i, 4.0));
        if i % k + 1 < k {
            triplets.push((i, i + 1, -1.0));
            triplets.push((i + 1, i, -1.0));
        }
        if i + k < n {
            triplets.push((i, i + k, -1.0));
            triplets.push((i + k, i, -1.0));
        }
    }
    SparseMatrix::from_triplets((n, n), &triplets).unwrap()
}

#[test]
fn test_scenario_structural_formats() {
    let matrix = scenario_matrix();
    assert_eq!(matrix.index_pointer_length(), 3);

    assert_eq!(coo(&matrix), SizeEstimate::new(32.0, 32.0, "COO"));
    assert_eq!(csc(&matrix), SizeEstimate::new(28.0, 32.0, "CSC"));

    let standard = csr(&matrix, 52, 32).unwrap();
    assert_relative_eq!(standard.metadata_bytes, 28.0);
    assert_relative_eq!(standard.data_bytes, 32.0);
    assert_eq!(standard.label, "CSR: 64 bit data and 32 bit index");
}

#[test]
fn test_scenario_dictionary() {
    let matrix = scenario_matrix();

    // two slots hold both distinct values
    let wide = bounded_dictionary(matrix.order(), matrix.values(), Some(1), None).unwrap();
    assert_eq!(wide.capacity, 2);
    assert_eq!(wide.covered, 4);
    assert_eq!(wide.compressed_entry_bytes, 1);
    assert_eq!(wide.uncompressed_entry_bytes, 0);
    assert_eq!(wide.overhead_bytes, 4 * 2);

    // a single slot keeps only 1.0, which occurs three times
    let single = bounded_dictionary(matrix.order(), matrix.values(), Some(0), None).unwrap();
    assert_eq!(single.capacity, 1);
    assert_eq!(single.covered, 3);
    assert_eq!(single.uncompressed_entry_bytes, 8);
}

#[test]
fn test_coo_and_csr_properties_on_laplacian() {
    let matrix = laplacian(6);
    let nnz = matrix.nnz() as f64;

    let estimate = coo(&matrix);
    assert_relative_eq!(estimate.metadata_bytes, 8.0 * nnz);
    assert_relative_eq!(estimate.data_bytes, 8.0 * nnz);

    assert_relative_eq!(csr(&matrix, 52, 32).unwrap().data_bytes, 8.0 * nnz);

    let mut previous = 0.0;
    for index_bits in [1, 8, 16, 24, 32, 48, 64] {
        let metadata = csr(&matrix, 52, index_bits).unwrap().metadata_bytes;
        assert!(metadata >= previous);
        previous = metadata;
    }
}

#[test]
fn test_identical_values_compress_to_one_bit() {
    let triplets: Vec<(usize, usize, f64)> = (0..20).map(|i| (i, (i * 7) % 20, 3.5)).collect();
    let matrix = SparseMatrix::from_triplets((20, 20), &triplets).unwrap();

    let estimate = bounded_dictionary(matrix.order(), matrix.values(), Some(1), None).unwrap();
    assert_eq!(estimate.covered, matrix.nnz());
    assert_eq!(estimate.compressed_entry_bytes, 3); // ceil(20 / 8)
    assert_eq!(estimate.uncompressed_entry_bytes, 0);
}

#[test]
fn test_shared_table_matches_fresh_count() {
    let matrix = laplacian(5);
    let table = FrequencyTable::from_values(matrix.values());

    for bits in [0, 1, 2, 10] {
        let fresh = bounded_dictionary(matrix.order(), matrix.values(), Some(bits), None).unwrap();
        let shared =
            bounded_dictionary(matrix.order(), matrix.values(), Some(bits), Some(&table)).unwrap();
        assert_eq!(fresh.total_bytes, shared.total_bytes);
        assert_eq!(fresh.covered, shared.covered);
    }

    let (_, rows) = dictionary_sweep(matrix.order(), matrix.values(), &[0, 1, 2, 10]).unwrap();
    assert_eq!(rows.len(), 4);
    assert!(rows.windows(2).all(|w| w[0].covered <= w[1].covered));
}

#[test]
fn test_dia_is_cheap_for_banded_matrices() {
    let matrix = laplacian(8);
    let dia_estimate = dia(&matrix);
    // offsets -8, -1, 0, 1, 8
    assert_relative_eq!(dia_estimate.metadata_bytes, 20.0);
    assert!(dia_estimate.data_bytes >= 8.0 * matrix.nnz() as f64);
}

#[test]
fn test_report_from_matrix_market_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "%%MatrixMarket matrix coordinate real general").unwrap();
    writeln!(file, "3 3 5").unwrap();
    writeln!(file, "1 1 2.0").unwrap();
    writeln!(file, "2 2 2.0").unwrap();
    writeln!(file, "3 3 2.0").unwrap();
    writeln!(file, "1 2 -1.0").unwrap();
    writeln!(file, "2 3 -1.0").unwrap();
    file.flush().unwrap();

    let matrix = SparseMatrix::from_matrix_market(file.path()).unwrap();
    assert_eq!(matrix.nnz(), 5);

    let report = StorageReport::build(&matrix, &StorageConfig::default()).unwrap();
    assert_eq!(report.order, 3);
    assert_eq!(report.nnz, 5);
    assert_eq!(report.distinct_values, 2);
    assert_eq!(report.formats.len(), 6);
    assert_eq!(report.formats[0].label, "COO");
    assert_eq!(report.formats[5].label, "CSR_BD");
    assert_eq!(report.mantissa_sweep.len(), 5);
    assert_eq!(report.dictionary_sweep.len(), 6);
    assert!(report.smallest().is_some());

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"CSR_BD\""));
}

#[test]
fn test_config_file_drives_report() {
    let config = StorageConfig::from_yaml(
        "mantissa_bitwidth: 23\nindex_bitwidth: 16\ndictionary_sweep: [1, 2]\n",
    )
    .unwrap();
    let report = StorageReport::build(&laplacian(4), &config).unwrap();

    assert_eq!(report.formats[2].label, "CSR: 35 bit data and 16 bit index");
    assert_eq!(report.dictionary_sweep.len(), 2);
}

#[test]
fn test_invalid_config_is_rejected() {
    assert!(matches!(
        StorageConfig::from_yaml("index_bitwidth: 0\n"),
        Err(SparseGrindError::Configuration(_))
    ));
}

#[test]
fn test_reordering_preserves_storage_cost() {
    let matrix = laplacian(4);
    let rcm = reverse_cuthill_mckee(&matrix).unwrap();
    let permuted = rcm.apply(&matrix).unwrap();

    assert_eq!(coo(&permuted), coo(&matrix));
    assert_eq!(csr(&permuted, 52, 32).unwrap(), csr(&matrix, 52, 32).unwrap());
    assert!(rcm.bandwidth_after <= rcm.bandwidth_before);
}
