//! Tensor types - owned source tensors and zero-copy views

use super::{DType, ElementType};
use half::{bf16, f16};

/// Product of the dimensions, `None` on overflow. A rank-0 shape has one element.
pub(crate) fn checked_num_elements(shape: &[u64]) -> Option<u64> {
    shape.iter().try_fold(1u64, |acc, &dim| acc.checked_mul(dim))
}

/// Owned source tensor (for building/writing)
///
/// `data` holds the row-major elements as little-endian bytes of `element_type`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    pub element_type: ElementType,
    pub shape: Vec<u64>,
    pub data: Vec<u8>,
}

impl Tensor {
    pub fn new(element_type: ElementType, shape: Vec<u64>, data: Vec<u8>) -> Self {
        Self {
            element_type,
            shape,
            data,
        }
    }

    pub fn from_f32(shape: Vec<u64>, values: &[f32]) -> Self {
        let data = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        Self::new(ElementType::F32, shape, data)
    }

    pub fn from_f64(shape: Vec<u64>, values: &[f64]) -> Self {
        let data = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        Self::new(ElementType::F64, shape, data)
    }

    pub fn from_f16(shape: Vec<u64>, values: &[f16]) -> Self {
        let data = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        Self::new(ElementType::F16, shape, data)
    }

    pub fn from_bf16(shape: Vec<u64>, values: &[bf16]) -> Self {
        let data = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        Self::new(ElementType::BF16, shape, data)
    }

    pub fn from_i64(shape: Vec<u64>, values: &[i64]) -> Self {
        let data = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        Self::new(ElementType::I64, shape, data)
    }

    /// Tensor of the given shape with every element set to `value`
    pub fn full(shape: Vec<u64>, value: f32) -> Self {
        let n = checked_num_elements(&shape).unwrap_or(0) as usize;
        Self::from_f32(shape, &vec![value; n])
    }

    pub fn shape(&self) -> &[u64] {
        &self.shape
    }

    /// Raw little-endian element bytes
    pub fn element_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Total number of elements
    pub fn num_elements(&self) -> u64 {
        self.shape.iter().product()
    }

    /// Expected data size in bytes for the source element type
    pub fn expected_size(&self) -> u64 {
        self.num_elements() * self.element_type.element_size() as u64
    }
}

/// Descriptor record for one tensor: everything except the payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TensorDescriptor {
    pub name: String,
    pub shape: Vec<u64>,
    pub dtype: DType,
    pub offset: u64,
}

impl TensorDescriptor {
    /// Serialized size of a descriptor with this name length and rank
    pub fn encoded_size(name_len: usize, n_dims: usize) -> u64 {
        (4 + name_len + 4 + 8 * n_dims + 4 + 8) as u64
    }

    pub fn num_elements(&self) -> u64 {
        self.shape.iter().product()
    }

    /// Payload length in bytes
    pub fn payload_size(&self) -> u64 {
        self.num_elements() * self.dtype.element_size() as u64
    }
}

/// View of a decoded tensor (zero-copy)
#[derive(Debug, Clone, PartialEq)]
pub struct TensorView<'a> {
    pub name: &'a str,
    pub shape: Vec<u64>,
    pub dtype: DType,
    pub offset: u64,
    pub data: &'a [u8],
}

impl<'a> TensorView<'a> {
    /// Total number of elements
    pub fn num_elements(&self) -> u64 {
        self.shape.iter().product()
    }

    pub fn descriptor(&self) -> TensorDescriptor {
        TensorDescriptor {
            name: self.name.to_string(),
            shape: self.shape.clone(),
            dtype: self.dtype,
            offset: self.offset,
        }
    }

    /// Iterate the payload as f32 values without copying it first
    pub fn iter_f32(&self) -> impl Iterator<Item = f32> + 'a {
        let data: &'a [u8] = self.data;
        data.chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
    }

    pub fn to_f32_vec(&self) -> Vec<f32> {
        self.iter_f32().collect()
    }

    /// Convert to an owned f32 tensor
    pub fn to_owned(&self) -> Tensor {
        Tensor::new(ElementType::F32, self.shape.clone(), self.data.to_vec())
    }
}

/// Ordered collection of named tensors
///
/// Order is insertion order and is the order of the descriptor table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TensorMap(Vec<(String, Tensor)>);

impl TensorMap {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, name: impl Into<String>, tensor: Tensor) -> &mut Self {
        self.0.push((name.into(), tensor));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Tensor> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tensor)> {
        self.0.iter().map(|(n, t)| (n.as_str(), t))
    }
}

impl<K: Into<String>> FromIterator<(K, Tensor)> for TensorMap {
    fn from_iter<I: IntoIterator<Item = (K, Tensor)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, t)| (k.into(), t)).collect())
    }
}

impl From<Vec<(String, Tensor)>> for TensorMap {
    fn from(v: Vec<(String, Tensor)>) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn num_elements_of_scalar_is_one() {
        assert_eq!(checked_num_elements(&[]), Some(1));
        assert_eq!(checked_num_elements(&[2, 0, 7]), Some(0));
        assert_eq!(checked_num_elements(&[u64::MAX, 2]), None);
    }

    #[test]
    fn descriptor_size() {
        // name_len + "w" + n_dims + 2 dims + dtype + offset
        assert_eq!(TensorDescriptor::encoded_size(1, 2), 4 + 1 + 4 + 16 + 4 + 8);
        assert_eq!(TensorDescriptor::encoded_size(0, 0), 20);
    }

    #[test]
    fn full_tensor() {
        let t = Tensor::full(vec![2, 3], 1.0);
        assert_eq!(t.element_type, ElementType::F32);
        assert_eq!(t.data.len(), 24);
        assert_eq!(t.expected_size(), 24);
    }

    #[test]
    fn map_keeps_insertion_order() {
        let mut map = TensorMap::new();
        map.push("z", Tensor::full(vec![1], 0.0));
        map.push("a", Tensor::full(vec![1], 1.0));
        let names: Vec<&str> = map.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["z", "a"]);
        assert!(map.get("a").is_some());
        assert!(map.get("b").is_none());
    }

    #[test]
    fn view_reads_f32() {
        let bytes: Vec<u8> = [1.5f32, -2.0].iter().flat_map(|f| f.to_le_bytes()).collect();
        let view = TensorView {
            name: "t",
            shape: vec![2],
            dtype: DType::F32,
            offset: 0,
            data: &bytes,
        };
        assert_eq!(view.to_f32_vec(), vec![1.5, -2.0]);
        assert_eq!(view.to_owned().data, bytes);
    }
}
