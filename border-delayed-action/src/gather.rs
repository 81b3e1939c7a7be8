//! Batched indexed gather.
//!
//! [`pick_from_dim`] answers "for each row `i` of the batch axis, take the slice at
//! `indices[i]` of the selection axis". It is built on [`gather`], which follows the
//! semantics of `gather` in tensor libraries: the output has the shape of the index array
//! and `out[ix] = input[ix with ix[axis] replaced by index[ix]]`.
use border_core::error::BorderError;
use ndarray::{Array, ArrayBase, ArrayD, Axis, Data, Dimension, Ix1, IxDyn};

/// Gathers values of `input` along `axis` at the positions given by `index`.
///
/// `index` must have the rank of `input`, its extent along `axis` is free and its extent
/// along every other axis must not exceed the one of `input`.
pub fn gather<A, S, T, D>(
    input: &ArrayBase<S, D>,
    axis: usize,
    index: &ArrayBase<T, D>,
) -> Result<Array<A, D>, BorderError>
where
    A: Clone,
    S: Data<Elem = A>,
    T: Data<Elem = usize>,
    D: Dimension,
{
    let input = input.view().into_dyn();
    let index = index.view().into_dyn();

    if input.ndim() != index.ndim() {
        return Err(BorderError::DimensionError(format!(
            "input has {} dimensions but index has {}",
            input.ndim(),
            index.ndim()
        )));
    }
    if axis >= input.ndim() {
        return Err(BorderError::DimensionError(format!(
            "axis {} is out of range for {} dimensions",
            axis,
            input.ndim()
        )));
    }
    for (d, (&n_in, &n_ix)) in input.shape().iter().zip(index.shape()).enumerate() {
        if d != axis && n_ix > n_in {
            return Err(BorderError::DimensionError(format!(
                "index size {} exceeds input size {} along axis {}",
                n_ix, n_in, d
            )));
        }
    }
    let size = input.shape()[axis];
    if let Some(&k) = index.iter().find(|&&k| k >= size) {
        return Err(BorderError::DimensionError(format!(
            "index {} is out of bounds for axis {} of size {}",
            k, axis, size
        )));
    }

    let out = ArrayD::from_shape_fn(index.raw_dim(), |ix: IxDyn| {
        let mut src = ix.clone();
        src[axis] = index[ix.slice()];
        input[src.slice()].clone()
    });

    out.into_dimensionality::<D>()
        .map_err(|e| BorderError::DimensionError(e.to_string()))
}

/// For each position `i` along `foreach_axis`, picks the slice at `indices[i]` along
/// `pick_axis`.
///
/// The output is `input` with `pick_axis` removed. When `input` is `[L, M, K]`,
/// `foreach_axis = 0` and `pick_axis = 1`, the output is `[L, K]` and
/// `out[i, :] = input[i, indices[i], :]`.
///
/// ```
/// use border_delayed_action::pick_from_dim;
/// use ndarray::{array, Array1};
///
/// let history = array![[[1., 1.], [0., 0.]], [[4., 4.], [3., 3.]]];
/// let delay = Array1::from(vec![1usize, 0]);
/// let out = pick_from_dim(&history, 0, 1, &delay).unwrap();
/// assert_eq!(out, array![[0., 0.], [4., 4.]].into_dyn());
/// ```
///
/// # Errors
///
/// [`BorderError::DimensionError`] when `indices` is not one-dimensional, when both axes
/// are the same or out of range, when `indices.len()` differs from the size of
/// `foreach_axis`, or when an index is out of range of `pick_axis`.
pub fn pick_from_dim<A, S, T, D, E>(
    input: &ArrayBase<S, D>,
    foreach_axis: usize,
    pick_axis: usize,
    indices: &ArrayBase<T, E>,
) -> Result<ArrayD<A>, BorderError>
where
    A: Clone,
    S: Data<Elem = A>,
    T: Data<Elem = usize>,
    D: Dimension,
    E: Dimension,
{
    let input = input.view().into_dyn();
    let ndim = input.ndim();

    let indices = indices
        .view()
        .into_dimensionality::<Ix1>()
        .map_err(|_| {
            BorderError::DimensionError(format!(
                "indices must be one-dimensional, got {} dimensions",
                indices.ndim()
            ))
        })?;
    if foreach_axis == pick_axis {
        return Err(BorderError::DimensionError(format!(
            "foreach_axis and pick_axis must differ, both are {}",
            pick_axis
        )));
    }
    if foreach_axis >= ndim || pick_axis >= ndim {
        return Err(BorderError::DimensionError(format!(
            "axes ({}, {}) are out of range for {} dimensions",
            foreach_axis, pick_axis, ndim
        )));
    }
    let p = indices.len();
    if p != input.shape()[foreach_axis] {
        return Err(BorderError::DimensionError(format!(
            "{} indices for axis {} of size {}",
            p,
            foreach_axis,
            input.shape()[foreach_axis]
        )));
    }

    // [P, 1, 1] for input [P, M, K], foreach_axis = 0
    let pre_shape = (0..ndim)
        .map(|d| if d == foreach_axis { p } else { 1 })
        .collect::<Vec<_>>();
    // [P, 1, K]: like input, except size 1 along pick_axis
    let gather_shape = (0..ndim)
        .map(|d| if d == pick_axis { 1 } else { input.shape()[d] })
        .collect::<Vec<_>>();

    let gather_ix = ArrayD::from_shape_vec(IxDyn(&pre_shape), indices.to_vec())
        .map_err(|e| BorderError::DimensionError(e.to_string()))?;
    let gather_ix = gather_ix.broadcast(IxDyn(&gather_shape)).ok_or_else(|| {
        BorderError::DimensionError(format!(
            "cannot broadcast {:?} to {:?}",
            pre_shape, gather_shape
        ))
    })?;

    let out = gather(&input, pick_axis, &gather_ix)?;
    Ok(out.index_axis_move(Axis(pick_axis), 0))
}
