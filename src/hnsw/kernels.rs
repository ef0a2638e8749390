//! Distance kernels over f32 slices.
//!
//! Plain chunked loops with four independent accumulator lanes so the
//! compiler can auto-vectorize without per-platform intrinsics. Callers
//! validate lengths at the public boundaries; kernels only `debug_assert`.

/// Lanes processed per iteration. Four independent accumulators break the
/// loop-carried dependency chain that blocks vectorization of a naive sum.
const LANES: usize = 4;

/// Dot product of two equal-length f32 slices.
#[inline]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let len = a.len();
    let chunks = len / LANES * LANES;

    let mut acc = [0.0f32; LANES];
    let mut i = 0;
    while i < chunks {
        acc[0] += a[i] * b[i];
        acc[1] += a[i + 1] * b[i + 1];
        acc[2] += a[i + 2] * b[i + 2];
        acc[3] += a[i + 3] * b[i + 3];
        i += LANES;
    }
    let mut sum = (acc[0] + acc[1]) + (acc[2] + acc[3]);
    for j in chunks..len {
        sum += a[j] * b[j];
    }
    sum
}

/// Squared Euclidean distance between two equal-length f32 slices.
#[inline]
pub fn euclidean_sq(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let len = a.len();
    let chunks = len / LANES * LANES;

    let mut acc = [0.0f32; LANES];
    let mut i = 0;
    while i < chunks {
        let d0 = a[i] - b[i];
        let d1 = a[i + 1] - b[i + 1];
        let d2 = a[i + 2] - b[i + 2];
        let d3 = a[i + 3] - b[i + 3];
        acc[0] += d0 * d0;
        acc[1] += d1 * d1;
        acc[2] += d2 * d2;
        acc[3] += d3 * d3;
        i += LANES;
    }
    let mut sum = (acc[0] + acc[1]) + (acc[2] + acc[3]);
    for j in chunks..len {
        let d = a[j] - b[j];
        sum += d * d;
    }
    sum
}

/// Cosine similarity in `[-1, 1]`. Returns 0.0 when either vector has
/// (near-)zero norm, so degenerate vectors compare as maximally dissimilar
/// rather than producing NaN.
#[inline]
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let len = a.len();
    let chunks = len / LANES * LANES;

    let mut dot_acc = [0.0f32; LANES];
    let mut na_acc = [0.0f32; LANES];
    let mut nb_acc = [0.0f32; LANES];
    let mut i = 0;
    while i < chunks {
        for lane in 0..LANES {
            let x = a[i + lane];
            let y = b[i + lane];
            dot_acc[lane] += x * y;
            na_acc[lane] += x * x;
            nb_acc[lane] += y * y;
        }
        i += LANES;
    }
    let mut dot = (dot_acc[0] + dot_acc[1]) + (dot_acc[2] + dot_acc[3]);
    let mut norm_a = (na_acc[0] + na_acc[1]) + (na_acc[2] + na_acc[3]);
    let mut norm_b = (nb_acc[0] + nb_acc[1]) + (nb_acc[2] + nb_acc[3]);
    for j in chunks..len {
        dot += a[j] * b[j];
        norm_a += a[j] * a[j];
        norm_b += b[j] * b[j];
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < 1e-10 {
        return 0.0;
    }
    dot / denom
}
