//! Integration tests for ndarray support
//!
//! These tests export ndarray weights the way a training script would and
//! read them back as arrays on the loading side.

#![cfg(feature = "ndarray")]

use ggpack::{
    EncodingError, GgufError, Metadata, NdarrayError, Tensor, TensorMap, WriterOptions, encode,
    parse, writer,
};
use half::f16;
use ndarray::{ArrayD, IxDyn, array, s};

// =============================================================================
// Basic ndarray roundtrips
// =============================================================================

#[test]
fn roundtrip_ndarray_1d() {
    let bias = array![0.1f32, -0.2, 0.3, 0.4];
    let mut tensors = TensorMap::new();
    tensors.push("encoder.model.0.conv.conv.bias", Tensor::from_ndarray(&bias));

    let bytes = encode(&Metadata::new(), &tensors).unwrap();
    let view = parse(&bytes).unwrap();
    let back = view.tensors[0].to_ndarray().unwrap();
    assert_eq!(back, bias.into_dyn());
}

#[test]
fn roundtrip_conv_weight_3d() {
    let weight = ArrayD::from_shape_fn(IxDyn(&[8, 1, 7]), |idx| {
        (idx[0] * 7 + idx[2]) as f32 * 0.25 - 3.0
    });
    let mut tensors = TensorMap::new();
    tensors.push("w", Tensor::from_ndarray(&weight));

    let mut metadata = Metadata::new();
    metadata.push("kernel_size", 7).push("hidden_dim", 8);

    let bytes = encode(&metadata, &tensors).unwrap();
    let view = parse(&bytes).unwrap();
    let back = view.tensor("w").unwrap().to_ndarray().unwrap();
    assert_eq!(back.shape(), &[8, 1, 7]);
    assert_eq!(back, weight);
}

#[test]
fn sliced_and_transposed_sources_are_dense() {
    let base = array![[1.0f32, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
    let mut tensors = TensorMap::new();
    tensors.push("t", Tensor::from_ndarray(&base.t()));
    tensors.push("col", Tensor::from_ndarray(&base.slice(s![.., 1])));

    let bytes = encode(&Metadata::new(), &tensors).unwrap();
    let view = parse(&bytes).unwrap();

    let t = view.tensor("t").unwrap().to_ndarray().unwrap();
    assert_eq!(t, base.t().to_owned().into_dyn());

    let col = view.tensor("col").unwrap();
    assert_eq!(col.shape, vec![3]);
    assert_eq!(col.to_f32_vec(), vec![2.0, 5.0, 8.0]);
}

// =============================================================================
// Element narrowing
// =============================================================================

#[test]
fn f16_array_widens() {
    let arr = array![[f16::from_f32(0.5), f16::from_f32(-2.0)]];
    let mut tensors = TensorMap::new();
    tensors.push("h", Tensor::from_ndarray(&arr));

    let bytes = encode(&Metadata::new(), &tensors).unwrap();
    let back = parse(&bytes).unwrap().tensors[0].to_ndarray().unwrap();
    assert_eq!(back, array![[0.5f32, -2.0]].into_dyn());
}

#[test]
fn f64_array_needs_lossy_opt_in() {
    let arr = array![[1.0f64, 2.5], [-0.125, 1e-3]];
    let mut tensors = TensorMap::new();
    tensors.push("d", Tensor::from_ndarray(&arr));

    let err = encode(&Metadata::new(), &tensors).unwrap_err();
    assert!(matches!(
        err,
        GgufError::Encoding(EncodingError::LossyNarrowing { .. })
    ));

    let options = WriterOptions::default().allow_lossy_narrowing(true);
    let bytes = writer::to_bytes_with(&Metadata::new(), &tensors, &options).unwrap();
    let back = parse(&bytes).unwrap().tensors[0].to_ndarray().unwrap();
    assert_eq!(back, arr.mapv(|v| v as f32).into_dyn());
}

// =============================================================================
// Zero-copy views
// =============================================================================

#[test]
fn zero_copy_view_matches_copy_when_aligned() {
    let arr = array![[1.0f32, 2.0], [3.0, 4.0]];
    let mut tensors = TensorMap::new();
    tensors.push("w", Tensor::from_ndarray(&arr));

    let bytes = encode(&Metadata::new(), &tensors).unwrap();
    let view = parse(&bytes).unwrap();
    let tensor = &view.tensors[0];

    // No padding in the format, so alignment depends on the buffer and offset
    match tensor.try_as_ndarray() {
        Ok(nd) => assert_eq!(nd.to_owned(), tensor.to_ndarray().unwrap()),
        Err(err) => assert_eq!(err, NdarrayError::AlignmentError),
    }
}
